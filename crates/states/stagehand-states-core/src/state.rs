//! State units and the request channel behaviors use to ask for transitions.

use std::fmt;

/// A behavior's handle back to its machine. Requests queued here are applied
/// by the machine after the callback returns; requests raised inside a
/// transition's own `disable`/`enable` are dropped with a warning, because
/// transitions cannot interrupt transitions.
#[derive(Default, Debug)]
pub struct StateContext {
    pub(crate) requests: Vec<TransitionRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TransitionRequest {
    Change(String),
    ReturnToPrevious,
}

impl StateContext {
    /// Ask the machine to change to `key` once this callback returns.
    pub fn change_state(&mut self, key: impl Into<String>) {
        self.requests.push(TransitionRequest::Change(key.into()));
    }

    /// Ask the machine to restore the previously active state.
    pub fn return_to_previous(&mut self) {
        self.requests.push(TransitionRequest::ReturnToPrevious);
    }
}

/// Unit of behavior driven by the machine's Enable/Action/Disable lifecycle.
/// All callbacks default to no-ops so states can implement only what they use.
pub trait StateBehavior {
    /// The state just became active.
    fn enable(&mut self, _ctx: &mut StateContext) {}

    /// One cooperative tick while active. Deciding whether and when to
    /// request a transition is this state's responsibility.
    fn action(&mut self, _ctx: &mut StateContext) {}

    /// The state is about to stop being active.
    fn disable(&mut self, _ctx: &mut StateContext) {}
}

/// Behavior that does nothing; stands in for schema-seeded states until the
/// host attaches the real one.
#[derive(Default, Debug, Clone, Copy)]
pub struct Passive;

impl StateBehavior for Passive {}

/// One named state plus its fixed outbound whitelist, set at configuration
/// time and never recomputed at runtime.
pub struct StateDef {
    pub(crate) key: String,
    pub(crate) transitions: Vec<String>,
    pub(crate) behavior: Box<dyn StateBehavior>,
}

impl StateDef {
    pub fn new(
        key: impl Into<String>,
        transitions: Vec<String>,
        behavior: Box<dyn StateBehavior>,
    ) -> Self {
        Self {
            key: key.into(),
            transitions,
            behavior,
        }
    }

    /// Whitelist check; absence of a key (including this state's own) means
    /// the transition is illegal.
    pub fn can_transition(&self, key: &str) -> bool {
        self.transitions.iter().any(|t| t == key)
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }
}

impl fmt::Debug for StateDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDef")
            .field("key", &self.key)
            .field("transitions", &self.transitions)
            .finish()
    }
}
