//! Stored machine schemas: the serde-facing configuration a host or editor
//! feeds in. The editor layer consumes this public API instead of poking at
//! machine internals.
//!
//! Notes:
//! - `states` order is preserved; it becomes the machine's owned order.
//! - `transitions` defaults to empty, which means no legal outbound
//!   transition at all (whitelist-only semantics).

use serde::{Deserialize, Serialize};

/// One state as stored: key plus outbound whitelist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSchema {
    pub key: String,
    #[serde(default)]
    pub transitions: Vec<String>,
}

/// Stored machine: ordered states and the key of the initial one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSchema {
    pub states: Vec<StateSchema>,
    pub initial: String,
}

impl MachineSchema {
    /// Basic validation: no duplicate keys, a member initial state, and no
    /// dangling transition targets.
    pub fn validate_basic(&self) -> Result<(), String> {
        for (i, state) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|earlier| earlier.key == state.key) {
                return Err(format!("duplicate state key '{}'", state.key));
            }
        }
        if !self.states.iter().any(|s| s.key == self.initial) {
            return Err(format!("initial state '{}' is not a member", self.initial));
        }
        for state in &self.states {
            for target in &state.transitions {
                if !self.states.iter().any(|s| s.key == *target) {
                    return Err(format!(
                        "state '{}' lists unknown transition target '{}'",
                        state.key, target
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parse stored-machine JSON into a validated [`MachineSchema`].
pub fn parse_machine_schema_json(s: &str) -> Result<MachineSchema, String> {
    let schema: MachineSchema =
        serde_json::from_str(s).map_err(|e| format!("parse error: {e}"))?;
    schema.validate_basic()?;
    Ok(schema)
}
