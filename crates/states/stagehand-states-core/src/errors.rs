//! Error taxonomy for the states crate.
//!
//! Runtime refusals (unknown target, off-whitelist, reentrant) degrade to a
//! warning plus a no-op; configuration errors surface from the builder as
//! `Result`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested key does not name a state owned by this machine.
    #[error("state '{0}' does not exist in this machine")]
    UnknownState(String),

    /// Two states were configured with the same key.
    #[error("duplicate state key '{0}'")]
    DuplicateKey(String),

    /// The builder was never told which state to start in.
    #[error("no initial state configured")]
    NoInitialState,

    /// The active state's whitelist does not contain the target.
    #[error("transition '{from}' -> '{to}' is not whitelisted")]
    IllegalTransition { from: String, to: String },

    /// A transition was requested while another transition was in progress.
    #[error("transition to '{0}' requested while another transition is in progress")]
    ReentrantTransition(String),

    /// `return_to_previous` with no stored history.
    #[error("no previous state recorded")]
    NoPreviousState,
}
