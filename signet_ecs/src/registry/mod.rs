//! Registry of entities, components and systems of ECS.

use std::collections::BTreeSet;

use super::component::{Component, ComponentKind, ComponentManager, ComponentSet, ComponentStorage};
use super::config::Config;
use super::entity::{Entity, EntityAllocator};
use super::error::{fatal, RegistryError, Result};
use super::system::{System, SystemHandle, SystemManager};
use super::Signature;


/// Storage for entities, components and systems of ECS.
///
/// Every mutation keeps three things consistent: signatures of entities,
/// stored components and entity sets of systems. Broken preconditions
/// (dead entity, uninstalled component or system, exceeded capacity)
/// are fatal and cause a panic.
///
pub struct Registry {
    config: Config,
    entities: EntityAllocator,
    components: ComponentManager,
    systems: SystemManager,
}

impl Registry {
    /// Creates registry with [default](Config::default) capacities.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        log::debug!(
            "creating registry for {} entities and {} component kinds",
            config.entity_max(),
            config.component_max(),
        );
        Self {
            config,
            entities: EntityAllocator::new(config.entity_max(), config.component_max()),
            components: ComponentManager::new(config.component_max()),
            systems: SystemManager::new(config.component_max()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates new entity with no components.
    ///
    /// # Panics
    ///
    /// Panics if [`entity_max`](Config::entity_max) entities are already alive.
    ///
    pub fn entity_create(&mut self) -> Entity {
        self.try_entity_create().unwrap_or_else(|error| fatal(error))
    }

    /// Creates new entity with no components.
    ///
    /// # Errors
    ///
    /// An error is returned if [`entity_max`](Config::entity_max) entities are already alive.
    ///
    pub fn try_entity_create(&mut self) -> Result<Entity> {
        let entity = self.entities.try_create()?;
        log::trace!("created {}", entity);
        Ok(entity)
    }

    /// Destroys the entity with all its components and removes it from every system.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive.
    ///
    pub fn entity_destroy(&mut self, entity: Entity) {
        self.entities
            .destroy(entity)
            .unwrap_or_else(|error| fatal(error));
        self.components.purge(entity);
        self.systems.entity_destroyed(entity);
        log::trace!("destroyed {}", entity);
    }

    pub fn entity_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Count of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Kinds of components currently attached to the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is out of range.
    ///
    pub fn entity_signature(&self, entity: Entity) -> &Signature {
        self.entities
            .signature(entity)
            .unwrap_or_else(|error| fatal(error))
    }

    /// Returns iterator over all alive entities.
    pub fn entity_iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().map(|(entity, _)| entity)
    }

    /// Installs component type `T`, assigning it next free kind.
    ///
    /// # Panics
    ///
    /// Panics if `T` was already installed or all component kinds are taken.
    ///
    pub fn component_install<T>(&mut self) -> ComponentKind
    where
        T: Component,
    {
        self.components
            .install::<T>()
            .unwrap_or_else(|error| fatal(error))
    }

    /// Attaches component to the entity, installing its type if needed.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive or already has component of type `T`.
    ///
    pub fn component_add<T>(&mut self, entity: Entity, component: T)
    where
        T: Component,
    {
        self.try_component_add(entity, component)
            .unwrap_or_else(|error| fatal(error))
    }

    fn try_component_add<T>(&mut self, entity: Entity, component: T) -> Result<()>
    where
        T: Component,
    {
        self.entities.check_alive(entity)?;
        if !self.components.is_installed::<T>() {
            self.components.install::<T>()?;
        }
        let kind = self.components.add(entity, component)?;
        self.update_signature(entity, kind, true)?;
        log::trace!("added {} to {}", kind, entity);
        Ok(())
    }

    /// Detaches component of type `T` from the entity and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not alive, `T` was not installed
    /// or the entity has no component of type `T`.
    ///
    pub fn component_remove<T>(&mut self, entity: Entity) -> T
    where
        T: Component,
    {
        self.try_component_remove(entity)
            .unwrap_or_else(|error| fatal(error))
    }

    fn try_component_remove<T>(&mut self, entity: Entity) -> Result<T>
    where
        T: Component,
    {
        self.entities.check_alive(entity)?;
        let kind = self.components.kind_of::<T>()?;
        let component = self.components.remove::<T>(entity)?;
        self.update_signature(entity, kind, false)?;
        log::trace!("removed {} from {}", kind, entity);
        Ok(component)
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not installed or the entity has no component of type `T`.
    ///
    pub fn component_get<T>(&self, entity: Entity) -> &T
    where
        T: Component,
    {
        self.components
            .get::<T>(entity)
            .unwrap_or_else(|error| fatal(error))
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not installed or the entity has no component of type `T`.
    ///
    pub fn component_get_mut<T>(&mut self, entity: Entity) -> &mut T
    where
        T: Component,
    {
        self.components
            .get_mut::<T>(entity)
            .unwrap_or_else(|error| fatal(error))
    }

    /// Retrieves component of type `T` attached to the entity, if any.
    pub fn component_try_get<T>(&self, entity: Entity) -> Option<&T>
    where
        T: Component,
    {
        self.components.get::<T>(entity).ok()
    }

    /// Returns `true` if component of type `T` is attached to the entity.
    pub fn component_has<T>(&self, entity: Entity) -> bool
    where
        T: Component,
    {
        self.components
            .storage::<T>()
            .map(|storage| storage.attached(entity))
            .unwrap_or(false)
    }

    /// Kind assigned to the component type `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not installed.
    ///
    pub fn component_type<T>(&self) -> ComponentKind
    where
        T: Component,
    {
        self.components
            .kind_of::<T>()
            .unwrap_or_else(|error| fatal(error))
    }

    /// Dense storage of all components of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not installed.
    ///
    pub fn component_storage<T>(&self) -> &ComponentStorage<T>
    where
        T: Component,
    {
        self.components
            .storage::<T>()
            .unwrap_or_else(|error| fatal(error))
    }

    /// Dense storage of all components of type `T`, mutably.
    ///
    /// Storage can be used to change component values only:
    /// attaching and detaching must go through the registry.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not installed.
    ///
    pub fn component_values_mut<T>(&mut self) -> &mut [T]
    where
        T: Component,
    {
        self.components
            .storage_mut::<T>()
            .map(ComponentStorage::as_mut_slice)
            .unwrap_or_else(|error| fatal(error))
    }

    /// Signature containing kinds of all component types of the set.
    ///
    /// # Panics
    ///
    /// Panics if any type of the set was not installed.
    ///
    pub fn signature_of<C>(&self) -> Signature
    where
        C: ComponentSet,
    {
        let kinds = C::kinds(&self.components).unwrap_or_else(|error| fatal(error));
        Signature::with_kinds(self.config.component_max(), kinds)
    }

    /// Creates an empty signature as wide as signatures of this registry.
    pub fn signature_empty(&self) -> Signature {
        Signature::new(self.config.component_max())
    }

    /// Installs system created with [`Default`].
    ///
    /// # Panics
    ///
    /// Panics if system of type `T` was already installed.
    ///
    pub fn system_install<T>(&mut self) -> SystemHandle<T>
    where
        T: System + Default,
    {
        self.system_install_with(T::default())
    }

    /// Takes ownership of the system and installs it.
    ///
    /// Installed system requires empty signature, so every alive entity joins it.
    ///
    /// # Panics
    ///
    /// Panics if system of type `T` was already installed.
    ///
    pub fn system_install_with<T>(&mut self, system: T) -> SystemHandle<T>
    where
        T: System,
    {
        let handle = self
            .systems
            .install(system)
            .unwrap_or_else(|error| fatal(error));
        self.rescan();
        handle
    }

    /// Sets signature required by the system of type `T`.
    ///
    /// Membership of every alive entity is recomputed immediately.
    ///
    /// # Panics
    ///
    /// Panics if system of type `T` was not installed.
    ///
    pub fn system_signature<T>(&mut self, signature: Signature)
    where
        T: System,
    {
        self.systems
            .set_required::<T>(signature)
            .unwrap_or_else(|error| fatal(error));
        self.rescan();
    }

    /// Makes the system of type `T` require every component type of the set,
    /// installing types which were not installed yet.
    ///
    /// # Panics
    ///
    /// Panics if system of type `T` was not installed or all component kinds are taken.
    ///
    pub fn system_require<T, C>(&mut self)
    where
        T: System,
        C: ComponentSet,
    {
        C::install(&mut self.components).unwrap_or_else(|error| fatal(error));
        let signature = self.signature_of::<C>();
        self.system_signature::<T>(signature);
    }

    /// Installed system of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this registry.
    ///
    pub fn system<T>(&self, handle: SystemHandle<T>) -> &T
    where
        T: System,
    {
        self.systems
            .get(handle)
            .unwrap_or_else(|| fatal(system_not_installed::<T>()))
    }

    /// Installed system of type `T`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this registry.
    ///
    pub fn system_mut<T>(&mut self, handle: SystemHandle<T>) -> &mut T
    where
        T: System,
    {
        self.systems
            .get_mut(handle)
            .unwrap_or_else(|| fatal(system_not_installed::<T>()))
    }

    /// Entities which have all components required by the system.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this registry.
    ///
    pub fn system_entities<T>(&self, handle: SystemHandle<T>) -> &BTreeSet<Entity>
    where
        T: System,
    {
        self.systems
            .entities(handle)
            .unwrap_or_else(|| fatal(system_not_installed::<T>()))
    }

    /// Signature required by the system.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this registry.
    ///
    pub fn system_required<T>(&self, handle: SystemHandle<T>) -> &Signature
    where
        T: System,
    {
        self.systems
            .required(handle)
            .unwrap_or_else(|| fatal(system_not_installed::<T>()))
    }

    /// Count of installed systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    fn update_signature(&mut self, entity: Entity, kind: ComponentKind, value: bool) -> Result<()> {
        let mut signature = self.entities.signature(entity)?.clone();
        signature.set(kind, value);
        self.entities.set_signature(entity, signature)?;

        let signature = self.entities.signature(entity)?;
        self.systems.signature_changed(entity, signature);
        Ok(())
    }

    fn rescan(&mut self) {
        for (entity, signature) in self.entities.iter() {
            self.systems.signature_changed(entity, signature);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn system_not_installed<T>() -> RegistryError
where
    T: System,
{
    RegistryError::SystemNotInstalled(std::any::type_name::<T>())
}
