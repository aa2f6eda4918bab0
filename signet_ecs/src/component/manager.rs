//! Utilities for managing component storages.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::{super::Entity, Component, ComponentKind, ComponentPool, ComponentStorage};
use crate::error::{RegistryError, Result};

/// Manager of all components of ECS.
///
/// Owns one storage per installed component type
/// and assigns every type its [`ComponentKind`].
///
pub struct ComponentManager {
    kinds: HashMap<TypeId, ComponentKind>,
    /// Storage of the kind `k` is stored at index `k`.
    storages: Vec<Box<dyn ComponentPool>>,
    capacity: usize,
}

impl ComponentManager {
    /// Creates new component manager for at most `capacity` component types.
    pub fn new(capacity: usize) -> Self {
        Self {
            kinds: HashMap::new(),
            storages: Vec::new(),
            capacity,
        }
    }

    /// Assigns next free kind to the type `T` and creates its storage.
    ///
    /// # Errors
    ///
    /// An error is returned if `T` was already installed
    /// or all component kinds are taken.
    ///
    pub fn install<T>(&mut self) -> Result<ComponentKind>
    where
        T: Component,
    {
        let typeid = TypeId::of::<T>();
        if self.kinds.contains_key(&typeid) {
            return Err(RegistryError::ComponentAlreadyInstalled(type_name::<T>()));
        }
        if self.storages.len() >= self.capacity {
            return Err(RegistryError::ComponentCapacityExhausted(self.capacity));
        }
        let kind = ComponentKind::from_index(self.storages.len());
        self.kinds.insert(typeid, kind);
        self.storages.push(Box::new(ComponentStorage::<T>::new()));
        log::debug!("installed component `{}` as {}", type_name::<T>(), kind);
        Ok(kind)
    }

    /// Returns `true` if type `T` was already installed.
    pub fn is_installed<T>(&self) -> bool
    where
        T: Component,
    {
        self.kinds.contains_key(&TypeId::of::<T>())
    }

    /// Kind assigned to the type `T`.
    pub fn kind_of<T>(&self) -> Result<ComponentKind>
    where
        T: Component,
    {
        self.kinds
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| RegistryError::ComponentNotInstalled(type_name::<T>()))
    }

    /// Inserts component of type `T` and attaches it to the entity.
    ///
    /// Returns kind of the inserted component.
    ///
    pub fn add<T>(&mut self, entity: Entity, component: T) -> Result<ComponentKind>
    where
        T: Component,
    {
        let kind = self.kind_of::<T>()?;
        self.storage_mut::<T>()?.insert(entity, component)?;
        Ok(kind)
    }

    /// Removes component of type `T` and detaches it from the entity.
    pub fn remove<T>(&mut self, entity: Entity) -> Result<T>
    where
        T: Component,
    {
        self.storage_mut::<T>()?
            .remove(entity)
            .ok_or_else(|| not_attached::<T>(entity))
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get<T>(&self, entity: Entity) -> Result<&T>
    where
        T: Component,
    {
        self.storage::<T>()?
            .get(entity)
            .ok_or_else(|| not_attached::<T>(entity))
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_mut<T>(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Component,
    {
        self.storage_mut::<T>()?
            .get_mut(entity)
            .ok_or_else(|| not_attached::<T>(entity))
    }

    /// Notifies every storage that the entity was destroyed.
    pub fn purge(&mut self, entity: Entity) {
        for storage in self.storages.iter_mut() {
            if storage.purge(entity) {
                log::trace!("purged `{}` of {}", storage.name(), entity);
            }
        }
    }

    /// Count of installed component types.
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Returns iterator over all type-erased storages with their kinds.
    pub fn pools(&self) -> impl Iterator<Item = (ComponentKind, &dyn ComponentPool)> {
        self.storages
            .iter()
            .enumerate()
            .map(|(index, storage)| (ComponentKind::from_index(index), &**storage))
    }

    pub fn storage<T>(&self) -> Result<&ComponentStorage<T>>
    where
        T: Component,
    {
        let kind = self.kind_of::<T>()?;
        let boxed = &self.storages[kind.index()];
        Ok(boxed.as_any().downcast_ref().expect("downcast error"))
    }

    pub fn storage_mut<T>(&mut self) -> Result<&mut ComponentStorage<T>>
    where
        T: Component,
    {
        let kind = self.kind_of::<T>()?;
        let boxed = &mut self.storages[kind.index()];
        Ok(boxed.as_any_mut().downcast_mut().expect("downcast error"))
    }
}

fn not_attached<T>(entity: Entity) -> RegistryError
where
    T: Component,
{
    RegistryError::ComponentNotAttached {
        name: type_name::<T>(),
        entity,
    }
}
