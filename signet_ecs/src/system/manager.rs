//! Utilities for managing installed systems and their entities.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use slotmap::SlotMap;

use super::{System, SystemHandle, SystemKey};
use crate::error::{RegistryError, Result};
use crate::{Entity, Signature};

struct SystemEntry {
    instance: Box<dyn Any>,
    name: &'static str,
    required: Signature,
    entities: BTreeSet<Entity>,
}

/// Manager of all systems of ECS.
///
/// Keeps for every system the set of entities matching its required signature.
///
pub struct SystemManager {
    systems: SlotMap<SystemKey, SystemEntry>,
    keys: HashMap<TypeId, SystemKey>,
    width: usize,
}

impl SystemManager {
    /// Creates new system manager for signatures `width` bits wide.
    pub fn new(width: usize) -> Self {
        Self {
            systems: SlotMap::with_key(),
            keys: HashMap::new(),
            width,
        }
    }

    /// Takes ownership of the system.
    ///
    /// System requires empty signature until [`set_required`](Self::set_required) is called.
    ///
    /// # Errors
    ///
    /// An error is returned if system of type `T` was already installed.
    ///
    pub fn install<T>(&mut self, system: T) -> Result<SystemHandle<T>>
    where
        T: System,
    {
        let typeid = TypeId::of::<T>();
        if self.keys.contains_key(&typeid) {
            return Err(RegistryError::SystemAlreadyInstalled(type_name::<T>()));
        }
        let key = self.systems.insert(SystemEntry {
            instance: Box::new(system),
            name: type_name::<T>(),
            required: Signature::new(self.width),
            entities: BTreeSet::new(),
        });
        self.keys.insert(typeid, key);
        log::debug!("installed system `{}`", type_name::<T>());
        Ok(SystemHandle::new(key))
    }

    /// Handle of installed system of type `T`.
    pub fn handle<T>(&self) -> Result<SystemHandle<T>>
    where
        T: System,
    {
        self.keys
            .get(&TypeId::of::<T>())
            .map(|&key| SystemHandle::new(key))
            .ok_or_else(|| RegistryError::SystemNotInstalled(type_name::<T>()))
    }

    /// Replaces signature required by the system of type `T`.
    ///
    /// Membership is not recomputed here: the caller must rescan alive entities
    /// with [`signature_changed`](Self::signature_changed).
    ///
    pub fn set_required<T>(&mut self, signature: Signature) -> Result<SystemHandle<T>>
    where
        T: System,
    {
        let handle = self.handle::<T>()?;
        let entry = &mut self.systems[handle.key()];
        log::debug!("system `{}` requires {:?}", entry.name, signature);
        entry.required = signature;
        Ok(handle)
    }

    /// Removes the entity from every system.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for (_, entry) in self.systems.iter_mut() {
            if entry.entities.remove(&entity) {
                log::trace!("{} left system `{}`", entity, entry.name);
            }
        }
    }

    /// Updates membership of the entity in every system after its signature changed.
    pub fn signature_changed(&mut self, entity: Entity, signature: &Signature) {
        for (_, entry) in self.systems.iter_mut() {
            if signature.contains_all(&entry.required) {
                if entry.entities.insert(entity) {
                    log::trace!("{} joined system `{}`", entity, entry.name);
                }
            } else if entry.entities.remove(&entity) {
                log::trace!("{} left system `{}`", entity, entry.name);
            }
        }
    }

    /// Entry of the system the handle points to.
    ///
    /// Handle of another registry may point to a slot holding system
    /// of another type: such handle resolves to nothing.
    ///
    fn entry<T>(&self, handle: SystemHandle<T>) -> Option<&SystemEntry>
    where
        T: System,
    {
        self.systems
            .get(handle.key())
            .filter(|entry| (*entry.instance).is::<T>())
    }

    pub fn get<T>(&self, handle: SystemHandle<T>) -> Option<&T>
    where
        T: System,
    {
        let entry = self.systems.get(handle.key())?;
        (*entry.instance).downcast_ref()
    }

    pub fn get_mut<T>(&mut self, handle: SystemHandle<T>) -> Option<&mut T>
    where
        T: System,
    {
        let entry = self.systems.get_mut(handle.key())?;
        (*entry.instance).downcast_mut()
    }

    /// Entities which signature contains the required signature of the system.
    pub fn entities<T>(&self, handle: SystemHandle<T>) -> Option<&BTreeSet<Entity>>
    where
        T: System,
    {
        self.entry(handle).map(|entry| &entry.entities)
    }

    /// Signature required by the system.
    pub fn required<T>(&self, handle: SystemHandle<T>) -> Option<&Signature>
    where
        T: System,
    {
        self.entry(handle).map(|entry| &entry.required)
    }

    /// Count of installed systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
