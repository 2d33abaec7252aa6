//! Transition-mediating state machine with a cooperative tick.

use std::fmt;

use log::warn;

use crate::errors::StateError;
use crate::state::{StateContext, StateDef, TransitionRequest};

/// Owns an ordered set of states plus the current-state pointer; every
/// transition is validated against the active state's whitelist before any
/// lifecycle callback fires.
///
/// Not internally thread-safe: a machine is driven by one logical tick owner.
/// Once built, `current` always indexes a member of the owned set.
pub struct StateMachine {
    states: Vec<StateDef>,
    current: usize,
    previous: Option<usize>,
    in_transition: bool,
}

impl StateMachine {
    pub(crate) fn assemble(states: Vec<StateDef>, current: usize) -> Self {
        Self {
            states,
            current,
            previous: None,
            in_transition: false,
        }
    }

    /// Enable the configured initial state. Run once by the builder.
    pub(crate) fn enable_current(&mut self) {
        self.in_transition = true;
        let mut ctx = StateContext::default();
        self.states[self.current].behavior.enable(&mut ctx);
        self.in_transition = false;
        self.drop_reentrant(ctx);
    }

    /// Key of the active state.
    #[inline]
    pub fn current_key(&self) -> &str {
        &self.states[self.current].key
    }

    /// Key of the single-level history entry, if one is stored.
    pub fn previous_key(&self) -> Option<&str> {
        self.previous.map(|i| self.states[i].key.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Change the active state. The four commit steps (disable old, record
    /// history, swap, enable new) are atomic from the caller's point of view:
    /// no `action` tick interleaves. Returns whether the transition committed;
    /// every refusal leaves the current state untouched, fires no callbacks,
    /// and logs one warning.
    pub fn change_state(&mut self, key: &str) -> bool {
        if self.in_transition {
            warn!("{}", StateError::ReentrantTransition(key.to_string()));
            return false;
        }
        let Some(target) = self.find(key) else {
            warn!("{}", StateError::UnknownState(key.to_string()));
            return false;
        };
        if !self.states[self.current].can_transition(key) {
            warn!(
                "{}",
                StateError::IllegalTransition {
                    from: self.states[self.current].key.clone(),
                    to: key.to_string(),
                }
            );
            return false;
        }

        self.in_transition = true;
        let mut ctx = StateContext::default();
        self.states[self.current].behavior.disable(&mut ctx);
        self.previous = Some(self.current);
        self.current = target;
        self.states[self.current].behavior.enable(&mut ctx);
        self.in_transition = false;
        self.drop_reentrant(ctx);
        true
    }

    /// Single-level undo: restore the stored previous state, then clear the
    /// history slot. There is no redo chain. The whitelist is not consulted
    /// on the way back; this is a history restore, not a normal transition.
    pub fn return_to_previous(&mut self) -> bool {
        if self.in_transition {
            warn!("{}", StateError::ReentrantTransition("<previous>".to_string()));
            return false;
        }
        let Some(previous) = self.previous else {
            warn!("{}", StateError::NoPreviousState);
            return false;
        };

        self.in_transition = true;
        let mut ctx = StateContext::default();
        self.states[self.current].behavior.disable(&mut ctx);
        self.current = previous;
        self.previous = None;
        self.states[self.current].behavior.enable(&mut ctx);
        self.in_transition = false;
        self.drop_reentrant(ctx);
        true
    }

    /// One cooperative tick: run the active state's `action`, then apply the
    /// transitions it requested, in order.
    pub fn action(&mut self) {
        if self.in_transition {
            return;
        }
        let mut ctx = StateContext::default();
        self.states[self.current].behavior.action(&mut ctx);
        self.apply(ctx);
    }

    fn apply(&mut self, ctx: StateContext) {
        for request in ctx.requests {
            match request {
                TransitionRequest::Change(key) => {
                    self.change_state(&key);
                }
                TransitionRequest::ReturnToPrevious => {
                    self.return_to_previous();
                }
            }
        }
    }

    /// Requests queued while a transition was already in flight are dropped.
    fn drop_reentrant(&self, ctx: StateContext) {
        for request in ctx.requests {
            let key = match request {
                TransitionRequest::Change(key) => key,
                TransitionRequest::ReturnToPrevious => "<previous>".to_string(),
            };
            warn!("{}", StateError::ReentrantTransition(key));
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.states.iter().position(|s| s.key == key)
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states.iter().map(|s| s.key()).collect::<Vec<_>>())
            .field("current", &self.current_key())
            .field("previous", &self.previous_key())
            .finish()
    }
}
