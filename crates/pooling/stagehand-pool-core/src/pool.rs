//! Recyclable instance pool over a host-provided factory.
//!
//! A pool owns a homogeneous set of instances built from one template, keeps
//! the available ones on a LIFO free list (most-recently-returned first, so
//! "hot" instances stay active), and associates each instance with
//! zero-or-one typed capability. Degradations are deliberately permissive:
//! re-initialization, double returns, and construction failures become one
//! warning or error log line plus a no-op, never a crash of the host session.

use std::any::Any;
use std::fmt;

use hashbrown::HashMap;
use log::{error, warn};

use crate::capability::{CapabilityKind, CapabilityRegistry};
use crate::errors::PoolError;
use crate::factory::{PoolFactory, Poolable};
use crate::ids::{IdAllocator, InstanceId};
use crate::template::{PoolCfg, Template};

/// Pool of recyclable instances of one template.
///
/// Not internally thread-safe: a pool is owned and driven by one logical tick
/// owner. Cross-thread discovery goes through the `PoolRegistry`.
pub struct ObjectPool<F: PoolFactory> {
    factory: F,
    template: Option<Template>,
    capability_kind: Option<CapabilityKind>,
    persistent: bool,
    initialized: bool,
    ids: IdAllocator,
    objects: HashMap<InstanceId, F::Object>,
    free: Vec<InstanceId>,
    capabilities: CapabilityRegistry,
    total_created: usize,
}

impl<F: PoolFactory> ObjectPool<F> {
    /// A fresh pool is empty and uninitialized; it holds the factory but
    /// creates nothing until [`ObjectPool::initialize`].
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            template: None,
            capability_kind: None,
            persistent: false,
            initialized: false,
            ids: IdAllocator::new(),
            objects: HashMap::new(),
            free: Vec::new(),
            capabilities: CapabilityRegistry::new(),
            total_created: 0,
        }
    }

    /// Exactly-once setup: record the template and requested capability kind,
    /// then eagerly create `cfg.count` instances. A construction failure is
    /// logged and that slot skipped; the remaining slots are still attempted.
    /// Re-initialization is a warned no-op and does not reset state.
    pub fn initialize(&mut self, template: Template, capability: CapabilityKind, cfg: PoolCfg) {
        if self.initialized {
            warn!(
                "pool '{}': {}; ignoring re-initialization as '{}'",
                self.key(),
                PoolError::AlreadyInitialized,
                template.key()
            );
            return;
        }
        self.initialized = true;
        self.persistent = cfg.persistent;
        self.capability_kind = Some(capability);
        self.template = Some(template);
        self.free.reserve(cfg.count);
        for _ in 0..cfg.count {
            self.create_instance();
        }
    }

    /// Lend one instance out. If the free list is empty, exactly one new
    /// instance is created first; the pool grows without bound under
    /// sustained demand, so borrowers are expected to return promptly.
    pub fn get_object(&mut self) -> Option<InstanceId> {
        if self.free.is_empty() && !self.create_instance() {
            return None;
        }
        let id = self.free.pop()?;
        if let Some(object) = self.objects.get_mut(&id) {
            self.factory.activate(object);
        }
        Some(id)
    }

    /// Lend one instance out and hand back its typed capability view.
    pub fn get_capability<T: Any>(&mut self) -> Result<(InstanceId, &T), PoolError> {
        let id = match self.get_object() {
            Some(id) => id,
            None => return Err(PoolError::CreateFailed(self.key().to_string())),
        };
        let capability = self.capabilities.get::<T>(id)?;
        Ok((id, capability))
    }

    /// Typed capability of a specific instance.
    pub fn capability<T: Any>(&self, instance: InstanceId) -> Result<&T, PoolError> {
        self.capabilities.get::<T>(instance)
    }

    /// Mutable typed capability of a specific instance.
    pub fn capability_mut<T: Any>(&mut self, instance: InstanceId) -> Result<&mut T, PoolError> {
        self.capabilities.get_mut::<T>(instance)
    }

    /// Host access to the underlying object of an owned instance.
    pub fn object(&self, instance: InstanceId) -> Option<&F::Object> {
        self.objects.get(&instance)
    }

    /// Mutable host access to the underlying object of an owned instance.
    pub fn object_mut(&mut self, instance: InstanceId) -> Option<&mut F::Object> {
        self.objects.get_mut(&instance)
    }

    /// Give an instance back so it can be lent out again. Double returns and
    /// instances the pool never owned are warned no-ops.
    pub fn return_object(&mut self, instance: InstanceId) {
        if self.free.contains(&instance) {
            warn!(
                "pool '{}': instance {:?} is already pooled; ignoring double return",
                self.key(),
                instance
            );
            return;
        }
        if !self.objects.contains_key(&instance) {
            warn!(
                "pool '{}': instance {:?} does not belong to this pool",
                self.key(),
                instance
            );
            return;
        }
        if let Some(object) = self.objects.get_mut(&instance) {
            self.factory.deactivate(object);
            if self.persistent {
                self.factory.persist(object);
            }
        }
        self.free.push(instance);
    }

    /// Instances currently available, not total ever created.
    #[inline]
    pub fn count(&self) -> usize {
        self.free.len()
    }

    /// Lifetime creation count; `count() + loaned() == total_created()`.
    #[inline]
    pub fn total_created(&self) -> usize {
        self.total_created
    }

    /// Instances currently out on loan.
    #[inline]
    pub fn loaned(&self) -> usize {
        self.objects.len() - self.free.len()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Destroy every instance via the factory and forget all registrations.
    /// The registry runs this on `clear`; `Drop` runs it as well.
    pub fn release_all(&mut self) {
        self.free.clear();
        self.capabilities.clear();
        for (_, object) in self.objects.drain() {
            self.factory.destroy(object);
        }
    }

    /// Construct one instance, bind its capabilities, and push it onto the
    /// free list. Returns whether a slot was actually filled.
    fn create_instance(&mut self) -> bool {
        let template = match self.template.clone() {
            Some(template) => template,
            None => {
                warn!("pool has not been initialized; cannot create an instance");
                return false;
            }
        };
        let kind = match self.capability_kind {
            Some(kind) => kind,
            None => return false,
        };
        let mut object = match self.factory.create(&template) {
            Some(object) => object,
            None => {
                error!("{}", PoolError::CreateFailed(template.name.clone()));
                return false;
            }
        };

        if !self.factory.bind_poolable(&mut object, template.key()) {
            error!(
                "template '{}' does not carry the poolable capability; skipping slot",
                template.key()
            );
            self.factory.destroy(object);
            return false;
        }
        let id = self.ids.alloc();

        // The base poolable kind is synthesized by the pool itself; anything
        // else is extracted from the instance by the host.
        if kind == CapabilityKind::of::<Poolable>() {
            self.capabilities.add(id, Poolable::new(template.key()));
        } else if let Some(capability) = self.factory.capability(&object, &kind) {
            self.capabilities.add_boxed(id, capability);
        } else {
            error!(
                "template '{}' does not carry capability '{}'",
                template.key(),
                kind.name()
            );
        }

        self.factory.deactivate(&mut object);
        if self.persistent {
            self.factory.persist(&mut object);
        }
        self.objects.insert(id, object);
        self.free.push(id);
        self.total_created += 1;
        true
    }

    fn key(&self) -> &str {
        self.template
            .as_ref()
            .map(|t| t.key())
            .unwrap_or("<uninitialized>")
    }
}

impl<F: PoolFactory> Drop for ObjectPool<F> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<F: PoolFactory> fmt::Debug for ObjectPool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("template", &self.template)
            .field("initialized", &self.initialized)
            .field("persistent", &self.persistent)
            .field("free", &self.free.len())
            .field("total_created", &self.total_created)
            .finish()
    }
}
