//! Template identity and pool configuration.

use serde::{Deserialize, Serialize};

/// Blueprint identity from which pool instances are constructed.
/// The name doubles as the pool's key in the `PoolRegistry`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.name
    }
}

/// Configuration for initializing a pool.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PoolCfg {
    /// Number of instances created eagerly at initialization.
    pub count: usize,
    /// Long-lived pools mark every created and returned instance as exempt
    /// from the host's scene-transition sweep.
    pub persistent: bool,
}

impl Default for PoolCfg {
    fn default() -> Self {
        Self {
            count: 1,
            persistent: false,
        }
    }
}
