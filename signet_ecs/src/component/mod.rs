//! Utilities for *components* in ECS.

use std::any::{type_name, Any};
use std::fmt;

pub use manager::*;
pub use storage::*;

use super::error::Result;

mod manager;
mod storage;
mod tests;

/// Objects of this trait represent *component* of ECS.
///
/// Components should be just POD (plain old data).
///
pub trait Component: Any + Send + Sync {}

impl<T> Component for T where T: Any + Send + Sync {}

/// Underlying integer type of component kinds.
pub type KindId = u32;

/// Bit position assigned to a component type inside of a registry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentKind(KindId);

impl ComponentKind {
    pub const fn new(id: KindId) -> Self {
        Self(id)
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as KindId)
    }

    pub const fn id(self) -> KindId {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ComponentKind({})", self.0)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "component kind #{}", self.0)
    }
}

/// Set of component types, implemented for tuples of up to 12 components.
///
/// Describes which component types are required by a system.
///
pub trait ComponentSet {
    /// Installs every type of the set which was not installed yet.
    fn install(manager: &mut ComponentManager) -> Result<()>;

    /// Kinds of every type of the set.
    ///
    /// # Errors
    ///
    /// An error is returned if any type of the set was not installed.
    ///
    fn kinds(manager: &ComponentManager) -> Result<Vec<ComponentKind>>;
}

macro_rules! impl_component_set {
    ($($name:ident),*) => {
        impl<$($name),*> ComponentSet for ($($name,)*)
        where
            $($name: Component,)*
        {
            #[allow(unused_variables)]
            fn install(manager: &mut ComponentManager) -> Result<()> {
                $(
                    if !manager.is_installed::<$name>() {
                        manager.install::<$name>()?;
                    }
                )*
                Ok(())
            }

            #[allow(unused_variables)]
            fn kinds(manager: &ComponentManager) -> Result<Vec<ComponentKind>> {
                Ok(vec![$(manager.kind_of::<$name>()?),*])
            }
        }
    };
}

impl_component_set!();
impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
impl_component_set!(A, B, C, D, E, F, G, H, I);
impl_component_set!(A, B, C, D, E, F, G, H, I, J);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K);
impl_component_set!(A, B, C, D, E, F, G, H, I, J, K, L);

/// Type-erased storage of one component type.
///
/// The only operation the registry needs without knowing concrete type
/// is removal of the data of destroyed entity.
///
pub trait ComponentPool: Any {
    /// Removes component of the entity, if any.
    ///
    /// Returns `true` if the entity had component in this storage.
    ///
    fn purge(&mut self, entity: super::Entity) -> bool;

    /// Count of stored components.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of stored component type.
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> ComponentPool for ComponentStorage<T>
where
    T: Component,
{
    fn purge(&mut self, entity: super::Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        ComponentStorage::len(self)
    }

    fn name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
