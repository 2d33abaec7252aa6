//! stagehand-pool-core (host-agnostic)
//!
//! Generic object pooling: a factory-backed [`ObjectPool`] that recycles
//! instances of one template, a [`CapabilityRegistry`] mapping each instance
//! to one typed capability, and a lock-guarded [`PoolRegistry`] directory so
//! unrelated call sites can fetch the right pool by template key without
//! holding a reference to it.

pub mod capability;
pub mod errors;
pub mod factory;
pub mod ids;
pub mod pool;
pub mod registry;
pub mod template;

// Re-exports for consumers (hosts and adapters)
pub use capability::{BoxedCapability, CapabilityKind, CapabilityRegistry};
pub use errors::PoolError;
pub use factory::{PoolFactory, Poolable};
pub use ids::{IdAllocator, InstanceId};
pub use pool::ObjectPool;
pub use registry::{PoolHandle, PoolRegistry};
pub use template::{PoolCfg, Template};
