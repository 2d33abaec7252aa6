//! Host collaborator that constructs, destroys, and introspects instances.

use crate::capability::{BoxedCapability, CapabilityKind};
use crate::template::Template;

/// Object factory plus capability host, supplied by the embedding runtime.
/// The pool never constructs templates itself.
pub trait PoolFactory {
    /// Host object type held by pools built over this factory.
    type Object;

    /// Construct one instance from the template. `None` is reported by the
    /// pool as a skipped slot, not an abort.
    fn create(&mut self, template: &Template) -> Option<Self::Object>;

    /// Tear one instance down. Called only when the pool itself is released.
    fn destroy(&mut self, object: Self::Object);

    /// Attach the base poolable marker, recording the owning pool's key.
    /// Returning `false` means the instance lacks the poolable capability;
    /// the pool logs an error, destroys the instance, and skips the slot.
    fn bind_poolable(&mut self, object: &mut Self::Object, pool_key: &str) -> bool;

    /// Extract the requested capability facet of `object`, if it carries one.
    fn capability(
        &mut self,
        object: &Self::Object,
        kind: &CapabilityKind,
    ) -> Option<BoxedCapability>;

    /// Called when an instance leaves the free list (host: unparent, mark active).
    fn activate(&mut self, _object: &mut Self::Object) {}

    /// Called when an instance re-enters the free list (host: reparent, mark inactive).
    fn deactivate(&mut self, _object: &mut Self::Object) {}

    /// Called by persistent pools on every created and returned instance so
    /// it survives the host's scene-transition sweep.
    fn persist(&mut self, _object: &mut Self::Object) {}
}

/// Base capability every pooled instance is expected to carry: a back-pointer
/// to the key of the pool that owns it. Borrowers resolve the key through the
/// `PoolRegistry` to return an instance without holding the pool itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poolable {
    pool_key: String,
}

impl Poolable {
    pub fn new(pool_key: impl Into<String>) -> Self {
        Self {
            pool_key: pool_key.into(),
        }
    }

    #[inline]
    pub fn pool_key(&self) -> &str {
        &self.pool_key
    }
}
