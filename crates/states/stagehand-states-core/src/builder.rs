//! Configuration-time assembly of a machine.
//!
//! The builder is the one place states, whitelists, and the initial state
//! are fixed; the machine never reconfigures itself at runtime. Hosts either
//! chain `state(..)` calls directly or seed the builder from a parsed
//! [`MachineSchema`] and attach behaviors per key.

use crate::errors::StateError;
use crate::machine::StateMachine;
use crate::schema::MachineSchema;
use crate::state::{Passive, StateBehavior, StateDef};

#[derive(Default)]
pub struct StateMachineBuilder {
    states: Vec<StateDef>,
    initial: Option<String>,
    unknown: Vec<String>,
}

impl StateMachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from a schema; every state starts [`Passive`] until
    /// [`StateMachineBuilder::behavior`] replaces it.
    pub fn from_schema(schema: MachineSchema) -> Self {
        let mut builder = Self::new().initial(&schema.initial);
        for state in schema.states {
            builder
                .states
                .push(StateDef::new(state.key, state.transitions, Box::new(Passive)));
        }
        builder
    }

    /// Add a state with its outbound whitelist.
    pub fn state(mut self, key: &str, transitions: &[&str], behavior: Box<dyn StateBehavior>) -> Self {
        let transitions = transitions.iter().map(|t| (*t).to_string()).collect();
        self.states.push(StateDef::new(key, transitions, behavior));
        self
    }

    /// Choose the state the machine starts in.
    pub fn initial(mut self, key: &str) -> Self {
        self.initial = Some(key.to_string());
        self
    }

    /// Replace the behavior of an already-declared state. Attaching to an
    /// undeclared key is reported by `build` as `UnknownState`.
    pub fn behavior(mut self, key: &str, behavior: Box<dyn StateBehavior>) -> Self {
        match self.states.iter_mut().find(|s| s.key == key) {
            Some(state) => state.behavior = behavior,
            None => self.unknown.push(key.to_string()),
        }
        self
    }

    /// Validate the configuration, assemble the machine, and enable its
    /// initial state.
    pub fn build(self) -> Result<StateMachine, StateError> {
        if let Some(key) = self.unknown.into_iter().next() {
            return Err(StateError::UnknownState(key));
        }
        for (i, state) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|earlier| earlier.key == state.key) {
                return Err(StateError::DuplicateKey(state.key.clone()));
            }
        }
        let initial = self.initial.ok_or(StateError::NoInitialState)?;
        let current = self
            .states
            .iter()
            .position(|s| s.key == initial)
            .ok_or(StateError::UnknownState(initial))?;

        let mut machine = StateMachine::assemble(self.states, current);
        machine.enable_current();
        Ok(machine)
    }
}
