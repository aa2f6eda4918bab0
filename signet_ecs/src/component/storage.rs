//! Dense storage for **components** of one type.

use std::any::type_name;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use super::{super::Entity, Component};
use crate::error::{RegistryError, Result};

/// Storage for statically typed components of ECS.
///
/// Components are kept densely packed: removal moves the last component
/// into the vacated slot, so `[0, len)` never contains holes.
///
pub struct ComponentStorage<T>
where
    T: Component,
{
    /// Components are actually stored here.
    components: Vec<T>,
    /// Owner of the component with the same index.
    index_to_entity: Vec<Entity>,
    entity_to_index: HashMap<Entity, usize>,
}

impl<T> ComponentStorage<T>
where
    T: Component,
{
    /// Creates an empty component storage.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            index_to_entity: Vec::new(),
            entity_to_index: HashMap::new(),
        }
    }

    /// Inserts component and attaches it to the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if component was already attached to the entity.
    ///
    pub fn insert(&mut self, entity: Entity, component: T) -> Result<()> {
        if self.attached(entity) {
            return Err(RegistryError::ComponentAlreadyAttached {
                name: type_name::<T>(),
                entity,
            });
        }
        let index = self.components.len();
        self.entity_to_index.insert(entity, index);
        self.index_to_entity.push(entity);
        self.components.push(component);
        Ok(())
    }

    /// Removes component and detaches it from the entity.
    ///
    /// Last component takes place of the removed one.
    /// Returns component that was attached to the entity, if any.
    ///
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_to_index.remove(&entity)?;
        let component = self.components.swap_remove(index);
        self.index_to_entity.swap_remove(index);
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
        }
        Some(component)
    }

    /// Returns `true` if component was already attached to the entity.
    pub fn attached(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Retrieves an immutable reference to component attached to the entity.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = *self.entity_to_index.get(&entity)?;
        self.components.get(index)
    }

    /// Retrieves a mutable reference to component attached to the entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = *self.entity_to_index.get(&entity)?;
        self.components.get_mut(index)
    }

    /// Dense index of component attached to the entity.
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.entity_to_index.get(&entity).copied()
    }

    /// Count of stored components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All components in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.components
    }

    /// All components in storage order, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Owners of the components, parallel to [`as_slice`](Self::as_slice).
    pub fn entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    /// Returns immutable iterator over all components with their entities.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.components.iter())
    }

    /// Returns mutable iterator over all components with their entities.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.components.iter_mut())
    }
}

impl<T> Default for ComponentStorage<T>
where
    T: Component,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Entity> for ComponentStorage<T>
where
    T: Component,
{
    type Output = T;

    fn index(&self, entity: Entity) -> &Self::Output {
        self.get(entity)
            .expect("there is no component attached to the entity")
    }
}

impl<T> IndexMut<Entity> for ComponentStorage<T>
where
    T: Component,
{
    fn index_mut(&mut self, entity: Entity) -> &mut Self::Output {
        self.get_mut(entity)
            .expect("there is no component attached to the entity")
    }
}
