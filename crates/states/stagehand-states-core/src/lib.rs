//! stagehand-states-core (host-agnostic)
//!
//! Finite-state-machine runtime: named states with whitelist-only outbound
//! transitions, an Enable/Action/Disable lifecycle driven by a cooperative
//! tick, single-level history, and a reentrancy guard so transitions cannot
//! interrupt transitions.

pub mod builder;
pub mod errors;
pub mod machine;
pub mod schema;
pub mod state;

// Re-exports for consumers (hosts and adapters)
pub use builder::StateMachineBuilder;
pub use errors::StateError;
pub use machine::StateMachine;
pub use schema::{parse_machine_schema_json, MachineSchema, StateSchema};
pub use state::{Passive, StateBehavior, StateContext, StateDef};
