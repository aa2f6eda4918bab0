//! Utilities for *entities* in ECS.

use std::collections::VecDeque;
use std::fmt;

use super::error::{RegistryError, Result};
use super::Signature;

/// Underlying integer type of entity identifiers.
pub type EntityId = u32;

/// Unique identifier of the *entity* of ECS.
///
/// Entity carries no data, it is only a key for components.
///
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(EntityId);

impl Entity {
    pub const fn new(id: EntityId) -> Self {
        Self(id)
    }

    pub const fn id(self) -> EntityId {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "entity #{}", self.0)
    }
}

/// Issues and recycles entity identifiers.
///
/// Free identifiers are kept in FIFO order, so identifier of destroyed entity
/// is reused only after all other free identifiers were issued.
///
pub struct EntityAllocator {
    available: VecDeque<Entity>,
    signatures: Box<[Signature]>,
    alive: Box<[bool]>,
    living: usize,
}

impl EntityAllocator {
    /// Creates allocator for `capacity` entities with signatures `width` bits wide.
    pub fn new(capacity: usize, width: usize) -> Self {
        let available = (0..capacity)
            .map(|index| Entity::new(index as EntityId))
            .collect();
        Self {
            available,
            signatures: vec![Signature::new(width); capacity].into_boxed_slice(),
            alive: vec![false; capacity].into_boxed_slice(),
            living: 0,
        }
    }

    /// Takes the oldest free identifier.
    ///
    /// # Errors
    ///
    /// An error is returned if all identifiers are alive.
    ///
    pub fn try_create(&mut self) -> Result<Entity> {
        let entity = self
            .available
            .pop_front()
            .ok_or_else(|| RegistryError::EntityCapacityExhausted(self.capacity()))?;
        self.alive[entity.index()] = true;
        self.living += 1;
        Ok(entity)
    }

    /// Clears signature of the entity and returns its identifier to the pool.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is out of range or not alive.
    ///
    pub fn destroy(&mut self, entity: Entity) -> Result<()> {
        self.check_alive(entity)?;
        let index = entity.index();
        self.signatures[index].reset();
        self.alive[index] = false;
        self.available.push_back(entity);
        self.living -= 1;
        Ok(())
    }

    /// Signature of the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is out of range.
    ///
    pub fn signature(&self, entity: Entity) -> Result<&Signature> {
        self.check_range(entity)?;
        Ok(&self.signatures[entity.index()])
    }

    /// Replaces signature of the entity.
    ///
    /// # Errors
    ///
    /// An error is returned if the entity is out of range.
    ///
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<()> {
        self.check_range(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Checks that the entity is in range and alive.
    pub fn check_alive(&self, entity: Entity) -> Result<()> {
        self.check_range(entity)?;
        if !self.alive[entity.index()] {
            return Err(RegistryError::EntityNotAlive(entity));
        }
        Ok(())
    }

    /// Count of alive entities.
    pub fn len(&self) -> usize {
        self.living
    }

    pub fn is_empty(&self) -> bool {
        self.living == 0
    }

    /// Maximum count of simultaneously alive entities.
    pub fn capacity(&self) -> usize {
        self.alive.len()
    }

    /// Returns iterator over all alive entities with their signatures.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &Signature)> {
        self.alive
            .iter()
            .zip(self.signatures.iter())
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, signature))| (Entity::new(index as EntityId), signature))
    }

    fn check_range(&self, entity: Entity) -> Result<()> {
        if entity.index() >= self.capacity() {
            return Err(RegistryError::EntityOutOfRange {
                entity,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentKind;

    #[test]
    fn test_create_destroy() {
        let mut allocator = EntityAllocator::new(4, 8);
        let entity = allocator.try_create().unwrap();
        assert_eq!(entity, Entity::new(0));
        assert!(allocator.is_alive(entity));
        assert_eq!(allocator.len(), 1);

        allocator.destroy(entity).unwrap();
        assert!(!allocator.is_alive(entity));
        assert!(allocator.is_empty());
    }

    #[test]
    fn test_fifo_recycling() {
        let mut allocator = EntityAllocator::new(3, 8);
        let first = allocator.try_create().unwrap();
        allocator.destroy(first).unwrap();

        // ids 1 and 2 were waiting longer than recycled id 0
        assert_eq!(allocator.try_create().unwrap(), Entity::new(1));
        assert_eq!(allocator.try_create().unwrap(), Entity::new(2));
        assert_eq!(allocator.try_create().unwrap(), first);
    }

    #[test]
    fn test_capacity_exhausted() {
        let mut allocator = EntityAllocator::new(2, 8);
        allocator.try_create().unwrap();
        allocator.try_create().unwrap();
        assert_eq!(
            allocator.try_create(),
            Err(RegistryError::EntityCapacityExhausted(2)),
        );
    }

    #[test]
    fn test_repeated_churn_never_exhausts() {
        let mut allocator = EntityAllocator::new(16, 8);
        for _ in 0..100 {
            let entities: Vec<_> = (0..16).map(|_| allocator.try_create().unwrap()).collect();
            for entity in entities {
                allocator.destroy(entity).unwrap();
            }
        }
        assert!(allocator.is_empty());
    }

    #[test]
    fn test_destroy_resets_signature() {
        let mut allocator = EntityAllocator::new(2, 8);
        let entity = allocator.try_create().unwrap();
        let signature = Signature::with_kinds(8, [ComponentKind::from_index(2)]);
        allocator.set_signature(entity, signature.clone()).unwrap();
        assert_eq!(allocator.signature(entity).unwrap(), &signature);

        allocator.destroy(entity).unwrap();
        assert!(allocator.signature(entity).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_entities() {
        let mut allocator = EntityAllocator::new(2, 8);
        let out_of_range = Entity::new(2);
        assert_eq!(
            allocator.signature(out_of_range),
            Err(RegistryError::EntityOutOfRange {
                entity: out_of_range,
                capacity: 2,
            }),
        );
        assert_eq!(
            allocator.destroy(Entity::new(1)),
            Err(RegistryError::EntityNotAlive(Entity::new(1))),
        );
    }

    #[test]
    fn test_iter_alive() {
        let mut allocator = EntityAllocator::new(4, 8);
        let a = allocator.try_create().unwrap();
        let b = allocator.try_create().unwrap();
        let c = allocator.try_create().unwrap();
        allocator.destroy(b).unwrap();
        let alive: Vec<_> = allocator.iter().map(|(entity, _)| entity).collect();
        assert_eq!(alive, [a, c]);
    }
}
