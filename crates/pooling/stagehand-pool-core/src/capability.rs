//! Typed capability storage for pooled instances.
//!
//! Each pooled instance carries at most one capability: a typed facet such as
//! "this instance also behaves as a Projectile". The registry maps an opaque
//! `InstanceId` to that facet and hands it back by type, failing with
//! `TypeMismatch` rather than yielding a wrong-typed value, and with
//! `InstanceNotFound` rather than a silent null.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use hashbrown::HashMap;

use crate::errors::PoolError;
use crate::ids::InstanceId;

/// Value-level request for a capability type, carried by pool configuration.
#[derive(Copy, Clone, Debug)]
pub struct CapabilityKind {
    id: TypeId,
    name: &'static str,
}

impl CapabilityKind {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CapabilityKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapabilityKind {}

/// One capability boxed for transport from the factory into the registry.
/// The concrete type name rides along for diagnostics.
pub struct BoxedCapability {
    name: &'static str,
    value: Box<dyn Any + Send>,
}

impl BoxedCapability {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            name: type_name::<T>(),
            value: Box::new(value),
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for BoxedCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedCapability")
            .field("type", &self.name)
            .finish()
    }
}

/// Mapping from an instance handle to its one typed capability.
#[derive(Default, Debug)]
pub struct CapabilityRegistry {
    entries: HashMap<InstanceId, BoxedCapability>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `capability` for `instance`. Last write wins; overwriting an
    /// earlier registration is permitted.
    pub fn add<T: Any + Send>(&mut self, instance: InstanceId, capability: T) {
        self.add_boxed(instance, BoxedCapability::new(capability));
    }

    /// Boxed variant of [`CapabilityRegistry::add`] for capabilities produced
    /// by a host factory.
    pub fn add_boxed(&mut self, instance: InstanceId, capability: BoxedCapability) {
        self.entries.insert(instance, capability);
    }

    /// Typed lookup of the capability registered for `instance`.
    pub fn get<T: Any>(&self, instance: InstanceId) -> Result<&T, PoolError> {
        let entry = self
            .entries
            .get(&instance)
            .ok_or(PoolError::InstanceNotFound(instance))?;
        entry
            .value
            .downcast_ref::<T>()
            .ok_or(PoolError::TypeMismatch {
                instance,
                stored: entry.name,
                requested: type_name::<T>(),
            })
    }

    /// Mutable typed lookup of the capability registered for `instance`.
    pub fn get_mut<T: Any>(&mut self, instance: InstanceId) -> Result<&mut T, PoolError> {
        let entry = self
            .entries
            .get_mut(&instance)
            .ok_or(PoolError::InstanceNotFound(instance))?;
        let stored = entry.name;
        entry
            .value
            .downcast_mut::<T>()
            .ok_or(PoolError::TypeMismatch {
                instance,
                stored,
                requested: type_name::<T>(),
            })
    }

    /// Idempotent; removing an unregistered instance is a no-op.
    pub fn remove(&mut self, instance: InstanceId) {
        self.entries.remove(&instance);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
