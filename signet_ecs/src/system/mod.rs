//! Utilities for *systems* in ECS.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use slotmap::new_key_type;

pub use manager::SystemManager;

mod manager;

/// Objects of this trait represent *system* of ECS.
///
/// Registry never runs systems itself: it only keeps the set of entities
/// whose signature contains the required signature of the system.
/// Driving systems is up to the caller.
///
pub trait System: Any {}

new_key_type! {
    /// Unique identifier of the *system* of ECS inside of the registry.
    pub struct SystemKey;
}

/// Lightweight handle to the installed system of type `T`.
///
/// Handle does not own the system: the system lives as long as its registry.
///
pub struct SystemHandle<T> {
    key: SystemKey,
    marker: PhantomData<fn() -> T>,
}

impl<T> SystemHandle<T> {
    pub(crate) fn new(key: SystemKey) -> Self {
        Self {
            key,
            marker: PhantomData,
        }
    }

    pub fn key(&self) -> SystemKey {
        self.key
    }
}

impl<T> Clone for SystemHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SystemHandle<T> {}

impl<T> PartialEq for SystemHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for SystemHandle<T> {}

impl<T> fmt::Debug for SystemHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("SystemHandle")
            .field(&std::any::type_name::<T>())
            .field(&self.key)
            .finish()
    }
}
