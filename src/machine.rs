//! Root wrapper that drives a state tree.

use crate::core::{State, StateError, StateId, StateSnapshot};

/// Top-level owner of a state tree.
///
/// The machine guards against entering or exiting twice in a row and offers
/// two ways to inject events: [`send_event`](Machine::send_event) works
/// top-down from the root, [`bubble_event`](Machine::bubble_event) starts at
/// the innermost active state and works upward. Both are ignored until the
/// machine has been entered.
///
/// # Example
///
/// ```rust
/// use statetree::{Machine, State};
///
/// let mut machine = Machine::new("player").unwrap();
/// let idle = State::new("idle").unwrap();
/// let running = State::new("running").unwrap();
/// machine
///     .root()
///     .add_children([&idle, &running])
///     .unwrap()
///     .add_transition("idle", "running", "run")
///     .unwrap();
///
/// assert!(!machine.send_event("run"));
///
/// machine.enter();
/// assert!(machine.send_event("run"));
/// assert_eq!(machine.root().active_child_id().unwrap().as_str(), "running");
/// ```
#[derive(Debug)]
pub struct Machine {
    root: State,
    entered: bool,
}

impl Machine {
    /// Create a machine around a fresh root state.
    pub fn new(id: impl Into<String>) -> Result<Self, StateError> {
        Ok(Self::from_state(State::new(id)?))
    }

    /// Wrap an existing state as the machine root.
    pub fn from_state(root: State) -> Self {
        Self {
            root,
            entered: false,
        }
    }

    pub fn root(&self) -> &State {
        &self.root
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter the active branch, top-down. No-op if already entered.
    pub fn enter(&mut self) {
        if self.entered {
            return;
        }
        self.entered = true;
        tracing::debug!(machine = %self.root.id(), "entering");
        self.root.enter_branch();
    }

    /// Run update callbacks over the active branch, top-down.
    pub fn update(&self) {
        self.root.update_branch();
    }

    /// Exit the active branch, bottom-up. No-op unless entered.
    pub fn exit(&mut self) {
        if !self.entered {
            return;
        }
        self.entered = false;
        tracing::debug!(machine = %self.root.id(), "exiting");
        self.root.exit_branch();
    }

    /// Offer `event` to the root's own transitions and responses, then drill
    /// it down the active branch. Returns whether it was consumed.
    pub fn send_event(&self, event: impl AsRef<str>) -> bool {
        let event = event.as_ref();
        if !self.entered {
            tracing::trace!(machine = %self.root.id(), event, "ignored event before enter");
            return false;
        }
        self.root.try_transition(event)
            || self.root.try_response(event)
            || self.root.drill_event(event)
    }

    /// Fire `event` at the innermost active state and let it bubble up.
    /// Returns whether it was consumed.
    pub fn bubble_event(&self, event: impl AsRef<str>) -> bool {
        let event = event.as_ref();
        if !self.entered {
            tracing::trace!(machine = %self.root.id(), event, "ignored event before enter");
            return false;
        }
        self.root.active_leaf().fire_event(event)
    }

    /// Ids from the root down to the innermost active state.
    pub fn active_path(&self) -> Vec<StateId> {
        self.root.active_path()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.root.snapshot()
    }
}

impl From<State> for Machine {
    fn from(root: State) -> Self {
        Self::from_state(root)
    }
}
