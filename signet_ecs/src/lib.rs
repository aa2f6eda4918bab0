//! Entity Component System (ECS) registry.
//!
//! Entities are small recycled integers, components of every type live in
//! dense storages, and systems get the set of entities whose signature
//! contains the signature they require. [`Registry`] keeps all of that
//! consistent after every mutation.
//!
//! ```
//! use signet_ecs::{Registry, System};
//!
//! struct Position(f32);
//! struct Velocity(f32);
//!
//! #[derive(Default)]
//! struct Movement;
//! impl System for Movement {}
//!
//! let mut registry = Registry::new();
//! let movement = registry.system_install::<Movement>();
//! registry.system_require::<Movement, (Position, Velocity)>();
//!
//! let entity = registry.entity_create();
//! registry.component_add(entity, Position(0.0));
//! registry.component_add(entity, Velocity(1.0));
//! assert!(registry.system_entities(movement).contains(&entity));
//! ```

pub use component::{Component, ComponentKind, ComponentPool, ComponentSet, ComponentStorage};
pub use config::Config;
pub use entity::{Entity, EntityId};
pub use error::{ConfigError, RegistryError};
pub use registry::Registry;
pub use signature::Signature;
pub use system::{System, SystemHandle, SystemKey};

pub mod component;
pub mod config;
pub mod entity;
pub mod error;
mod registry;
mod signature;
pub mod system;
