//! Configuration utilities for the ECS registry.

use semver::Version;

use super::component::KindId;
use super::entity::EntityId;
use super::error::ConfigError;

pub const ENGINE_NAME: &str = env!("CARGO_CRATE_NAME", "library must be compiled by Cargo");

const ENGINE_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "library must be compiled by Cargo");
lazy_static::lazy_static! {
    pub static ref ENGINE_VERSION: Version = ENGINE_VERSION_STR
        .parse()
        .expect("package version must be valid semver");
}

/// Default maximum of simultaneously alive entities.
pub const DEFAULT_ENTITY_MAX: usize = 5000;

/// Default maximum of distinct component kinds.
pub const DEFAULT_COMPONENT_MAX: usize = 32;

/// Capacity ceilings of the registry.
///
/// Both values are fixed for the lifetime of a registry.
/// Exceeding any of them at runtime is a fatal error.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    entity_max: usize,
    component_max: usize,
}

impl Config {
    /// Creates new configuration with given capacities.
    ///
    /// # Errors
    ///
    /// An error is returned if any capacity is zero
    /// or does not fit into the identifier type it describes.
    ///
    pub fn new(entity_max: usize, component_max: usize) -> Result<Self, ConfigError> {
        if entity_max == 0 {
            return Err(ConfigError::ZeroEntities);
        }
        if component_max == 0 {
            return Err(ConfigError::ZeroComponents);
        }
        if EntityId::try_from(entity_max).is_err() {
            return Err(ConfigError::TooManyEntities(entity_max));
        }
        if KindId::try_from(component_max).is_err() {
            return Err(ConfigError::TooManyComponents(component_max));
        }
        Ok(Self {
            entity_max,
            component_max,
        })
    }

    /// Maximum of simultaneously alive entities.
    pub fn entity_max(&self) -> usize {
        self.entity_max
    }

    /// Maximum of distinct component kinds, which is also the width of signatures.
    pub fn component_max(&self) -> usize {
        self.component_max
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_max: DEFAULT_ENTITY_MAX,
            component_max: DEFAULT_COMPONENT_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.entity_max(), 5000);
        assert_eq!(config.component_max(), 32);
    }

    #[test]
    fn test_rejects_zero() {
        assert_eq!(Config::new(0, 8), Err(ConfigError::ZeroEntities));
        assert_eq!(Config::new(8, 0), Err(ConfigError::ZeroComponents));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_rejects_overflow() {
        let too_many = usize::MAX;
        assert_eq!(
            Config::new(too_many, 8),
            Err(ConfigError::TooManyEntities(too_many)),
        );
    }

    #[test]
    fn test_engine_version() {
        assert_eq!(ENGINE_NAME, "signet_ecs");
        assert_eq!(ENGINE_VERSION.major, 0);
    }
}
