//! Process-wide directory of pools keyed by template identity.
//!
//! The registry is constructed explicitly by the host and handed to whoever
//! needs pool discovery; there is no global instance. It is the one structure
//! in this crate that takes a lock, because unrelated subsystems may register
//! pools concurrently during setup. The lock covers only the directory map;
//! each pool is locked independently through its handle.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashMap;
use log::warn;

use crate::capability::CapabilityKind;
use crate::errors::PoolError;
use crate::factory::PoolFactory;
use crate::pool::ObjectPool;
use crate::template::{PoolCfg, Template};

/// Shared handle to a registered pool.
pub type PoolHandle<F> = Arc<Mutex<ObjectPool<F>>>;

/// Directory mapping a template key to the pool that owns that template's
/// instances. Lives for the host's run; torn down only by [`PoolRegistry::clear`].
pub struct PoolRegistry<F: PoolFactory> {
    pools: Mutex<HashMap<String, PoolHandle<F>>>,
}

impl<F: PoolFactory> PoolRegistry<F> {
    pub fn new() -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Register `pool` under `key`, wrapping it in a shared handle.
    /// Last write wins; a replaced pool's instances are destroyed once its
    /// outstanding handles drop.
    pub fn add(&self, key: impl Into<String>, pool: ObjectPool<F>) -> PoolHandle<F> {
        let handle = Arc::new(Mutex::new(pool));
        self.lock().insert(key.into(), handle.clone());
        handle
    }

    /// Build, initialize, and register a pool in one step, keyed by the
    /// template's name.
    pub fn initialize_pool(
        &self,
        factory: F,
        template: Template,
        capability: CapabilityKind,
        cfg: PoolCfg,
    ) -> PoolHandle<F> {
        let key = template.name.clone();
        let mut pool = ObjectPool::new(factory);
        pool.initialize(template, capability, cfg);
        self.add(key, pool)
    }

    /// Fetch the pool registered under `key`. A miss is a configuration
    /// error, not a transient condition, and is logged as such.
    pub fn get(&self, key: &str) -> Option<PoolHandle<F>> {
        let handle = self.lock().get(key).cloned();
        if handle.is_none() {
            warn!("{}", PoolError::PoolNotFound(key.to_string()));
        }
        handle
    }

    /// Idempotent removal. The pool's instances are destroyed once the last
    /// outstanding handle drops.
    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Destroy every registered pool's underlying instances and empty the
    /// directory. Intended for full-run teardown.
    pub fn clear(&self) {
        // Drain under the registry lock, release instances outside it so a
        // pool lock is never taken while the directory is held.
        let handles: Vec<PoolHandle<F>> = self.lock().drain().map(|(_, pool)| pool).collect();
        for handle in handles {
            let mut pool = match handle.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            pool.release_all();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PoolHandle<F>>> {
        // A panic mid-mutation leaves the map itself consistent; recover the
        // guard rather than wedging every later caller.
        match self.pools.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<F: PoolFactory> Default for PoolRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PoolFactory> fmt::Debug for PoolRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        f.debug_struct("PoolRegistry").field("keys", &keys).finish()
    }
}
