#![cfg(test)]

use std::collections::HashSet;

use super::*;
use crate::error::RegistryError;
use crate::Entity;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity(f32, f32);

/// Every dense index must map back to a distinct entity resolving to the same index.
fn assert_dense<T: Component>(storage: &ComponentStorage<T>) {
    assert_eq!(storage.entities().len(), storage.len());
    let mut seen = HashSet::new();
    for (index, &entity) in storage.entities().iter().enumerate() {
        assert!(seen.insert(entity), "{} stored twice", entity);
        assert_eq!(storage.index_of(entity), Some(index));
    }
}

#[test]
fn test_insertion() {
    let mut storage = ComponentStorage::new();
    let entity = Entity::new(0);
    let component = "foo";

    storage.insert(entity, component).unwrap();
    assert!(storage.attached(entity));
    assert_eq!(storage[entity], "foo");

    assert_eq!(storage.remove(entity), Some("foo"));
    assert!(!storage.attached(entity));
    assert_eq!(storage.get(entity), None);
}

#[test]
fn test_double_insertion() {
    let mut storage = ComponentStorage::new();
    let entity = Entity::new(3);

    storage.insert(entity, 1).unwrap();
    let error = storage.insert(entity, 2).unwrap_err();
    assert!(matches!(
        error,
        RegistryError::ComponentAlreadyAttached { entity: e, .. } if e == entity
    ));
    assert_eq!(storage[entity], 1);
}

#[test]
#[should_panic]
fn test_index() {
    let mut storage = ComponentStorage::new();

    let entity = Entity::new(0);
    storage.insert(entity, 0).unwrap();
    storage[entity] = 5;
    assert_eq!(storage[entity], 5);

    let _component = storage[Entity::new(1)];
}

#[test]
fn test_swap_remove() {
    let mut storage = ComponentStorage::new();
    for id in 0..4 {
        storage.insert(Entity::new(id), id * 10).unwrap();
    }

    // last component moves into the hole
    assert_eq!(storage.remove(Entity::new(1)), Some(10));
    assert_eq!(storage.as_slice(), &[0, 30, 20]);
    assert_eq!(
        storage.entities(),
        &[Entity::new(0), Entity::new(3), Entity::new(2)],
    );
    assert_eq!(storage[Entity::new(3)], 30);
    assert_dense(&storage);

    // removing last component moves nothing
    assert_eq!(storage.remove(Entity::new(2)), Some(20));
    assert_eq!(storage.as_slice(), &[0, 30]);
    assert_dense(&storage);

    assert_eq!(storage.remove(Entity::new(2)), None);
}

#[test]
fn test_compaction_after_churn() {
    let mut storage = ComponentStorage::new();
    for id in 0..64 {
        storage.insert(Entity::new(id), id).unwrap();
    }
    for id in (0..64).filter(|id| id % 3 == 0) {
        storage.remove(Entity::new(id));
        assert_dense(&storage);
    }
    for id in (0..64).filter(|id| id % 6 == 0) {
        storage.insert(Entity::new(id), id).unwrap();
        assert_dense(&storage);
    }
    assert_eq!(storage.len(), 64 - 22 + 11);
    for (entity, &value) in storage.iter() {
        assert_eq!(entity.id(), value);
    }
}

#[test]
fn test_iterator() {
    let mut storage = ComponentStorage::new();
    for int in 0..100 {
        storage.insert(Entity::new(int as u32), int).unwrap();
    }

    for (_, component) in storage.iter_mut() {
        *component += 10;
    }
    for ((_, component), value) in storage.iter().zip(10..110) {
        assert_eq!(*component, value);
    }
    for component in storage.as_mut_slice() {
        *component -= 10;
    }
    assert_eq!(storage.as_slice(), (0..100).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_purge() {
    let mut storage = ComponentStorage::new();
    storage.insert(Entity::new(0), Position(1.0, 1.0)).unwrap();

    let pool: &mut dyn ComponentPool = &mut storage;
    assert!(pool.name().ends_with("Position"));
    assert!(!pool.purge(Entity::new(7)));
    assert_eq!(pool.len(), 1);
    assert!(pool.purge(Entity::new(0)));
    assert!(pool.is_empty());
    assert!(!pool.purge(Entity::new(0)));
}

#[test]
fn test_manager_kinds() {
    let mut manager = ComponentManager::new(8);
    assert!(!manager.is_installed::<Position>());

    let position = manager.install::<Position>().unwrap();
    let velocity = manager.install::<Velocity>().unwrap();
    assert_eq!(position, ComponentKind::new(0));
    assert_eq!(velocity, ComponentKind::new(1));
    assert_eq!(manager.kind_of::<Velocity>(), Ok(velocity));
    assert_eq!(manager.len(), 2);

    assert!(matches!(
        manager.install::<Position>(),
        Err(RegistryError::ComponentAlreadyInstalled(_))
    ));
    assert!(matches!(
        manager.kind_of::<u8>(),
        Err(RegistryError::ComponentNotInstalled(_))
    ));
}

#[test]
fn test_manager_capacity() {
    let mut manager = ComponentManager::new(1);
    manager.install::<Position>().unwrap();
    assert_eq!(
        manager.install::<Velocity>(),
        Err(RegistryError::ComponentCapacityExhausted(1)),
    );
}

#[test]
fn test_manager_routing() {
    let mut manager = ComponentManager::new(8);
    manager.install::<Position>().unwrap();
    manager.install::<Velocity>().unwrap();

    let entity = Entity::new(4);
    manager.add(entity, Position(0.0, 0.0)).unwrap();
    manager.add(entity, Velocity(1.0, 2.0)).unwrap();

    manager.get_mut::<Position>(entity).unwrap().0 = 5.0;
    assert_eq!(manager.get::<Position>(entity), Ok(&Position(5.0, 0.0)));
    assert_eq!(manager.remove::<Velocity>(entity), Ok(Velocity(1.0, 2.0)));
    assert!(matches!(
        manager.get::<Velocity>(entity),
        Err(RegistryError::ComponentNotAttached { .. })
    ));
    assert!(matches!(
        manager.add(entity, 0_u64),
        Err(RegistryError::ComponentNotInstalled(_))
    ));

    manager.purge(entity);
    assert!(manager.storage::<Position>().unwrap().is_empty());
    let sizes: Vec<_> = manager.pools().map(|(_, pool)| pool.len()).collect();
    assert_eq!(sizes, [0, 0]);
}

#[test]
fn test_component_set() {
    let mut manager = ComponentManager::new(8);
    assert!(<(Position, Velocity)>::kinds(&manager).is_err());

    manager.install::<Velocity>().unwrap();
    <(Position, Velocity)>::install(&mut manager).unwrap();
    let kinds = <(Position, Velocity)>::kinds(&manager).unwrap();
    assert_eq!(kinds, [ComponentKind::new(1), ComponentKind::new(0)]);
    assert!(<()>::kinds(&manager).unwrap().is_empty());
}
