//! Error types of the ECS registry.
//!
//! Every variant of [`RegistryError`] describes a broken precondition.
//! The registry does not recover from them: it logs the error and panics
//! with its message (see [`fatal`]).

use thiserror::Error;

use super::Entity;

/// Result of registry operation which reports failure as a value.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Violation of a registry precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("entity capacity of {0} exhausted")]
    EntityCapacityExhausted(usize),

    #[error("{entity} is out of range (capacity {capacity})")]
    EntityOutOfRange { entity: Entity, capacity: usize },

    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    #[error("component kind capacity of {0} exhausted")]
    ComponentCapacityExhausted(usize),

    #[error("component `{0}` installed more than once")]
    ComponentAlreadyInstalled(&'static str),

    #[error("component `{0}` used before installed")]
    ComponentNotInstalled(&'static str),

    #[error("component `{name}` added to {entity} more than once")]
    ComponentAlreadyAttached { name: &'static str, entity: Entity },

    #[error("component `{name}` is not attached to {entity}")]
    ComponentNotAttached { name: &'static str, entity: Entity },

    #[error("system `{0}` installed more than once")]
    SystemAlreadyInstalled(&'static str),

    #[error("system `{0}` used before installed")]
    SystemNotInstalled(&'static str),
}

/// Error that can happen on creation of [`Config`](crate::config::Config).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("entity capacity must be greater than zero")]
    ZeroEntities,

    #[error("component kind capacity must be greater than zero")]
    ZeroComponents,

    #[error("{0} exceeds the range of entity identifiers")]
    TooManyEntities(usize),

    #[error("{0} exceeds the range of component kinds")]
    TooManyComponents(usize),
}

/// Logs the error and aborts current operation by panicking.
#[cold]
pub(crate) fn fatal(error: RegistryError) -> ! {
    log::error!("{}", error);
    panic!("{}", error)
}
