//! Error taxonomy for the pooling crate.
//!
//! Most of these are recovered locally as a warning plus a no-op; `Result`
//! appears only where the caller asked a question (capability lookups).

use thiserror::Error;

use crate::ids::InstanceId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Re-initialization attempt; the pool keeps its original configuration.
    #[error("pool already initialized")]
    AlreadyInitialized,

    /// No capability was ever registered for this instance.
    #[error("no capability registered for instance {0:?}")]
    InstanceNotFound(InstanceId),

    /// No pool is registered under the given key.
    #[error("no pool registered under key '{0}'")]
    PoolNotFound(String),

    /// The stored capability is not of the requested type.
    #[error("capability for instance {instance:?} is '{stored}', not '{requested}'")]
    TypeMismatch {
        instance: InstanceId,
        stored: &'static str,
        requested: &'static str,
    },

    /// The factory failed to construct an instance from the template.
    #[error("factory failed to create an instance of template '{0}'")]
    CreateFailed(String),
}
