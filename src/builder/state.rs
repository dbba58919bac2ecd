//! Builder for describing a state tree declaratively.

use crate::core::{Behavior, EventId, EventResponse, State, StateError, TransitionOptions};
use crate::machine::Machine;

struct PendingTransition {
    from: String,
    to: String,
    on: EventId,
    options: TransitionOptions,
}

#[derive(Default)]
struct Hooks {
    enter: Vec<Behavior>,
    update: Vec<Behavior>,
    exit: Vec<Behavior>,
}

/// Builder for constructing a state and its subtree with a fluent API.
///
/// Nothing is validated until [`build`](StateBuilder::build). The whole
/// structure is assembled before any behavior is registered, so building a
/// tree does not run enter callbacks.
///
/// # Example
///
/// ```rust
/// use statetree::builder::StateBuilder;
///
/// let mut machine = StateBuilder::new("door")
///     .child(StateBuilder::new("closed").on_enter(|| println!("closed")))
///     .child(StateBuilder::new("open"))
///     .transition("closed", "open", "push")
///     .transition("open", "closed", "pull")
///     .build_machine()
///     .unwrap();
///
/// machine.enter();
/// assert!(machine.send_event("push"));
/// ```
pub struct StateBuilder {
    id: String,
    hooks: Hooks,
    children: Vec<StateBuilder>,
    transitions: Vec<PendingTransition>,
    responses: Vec<(EventId, EventResponse)>,
}

impl StateBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hooks: Hooks::default(),
            children: Vec::new(),
            transitions: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.hooks.enter.push(Behavior::new(callback));
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.hooks.update.push(Behavior::new(callback));
        self
    }

    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.hooks.exit.push(Behavior::new(callback));
        self
    }

    /// Add a child. The first child added becomes the default.
    pub fn child(mut self, child: StateBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Add an unguarded shallow transition between two children.
    pub fn transition(
        self,
        from: impl Into<String>,
        to: impl Into<String>,
        on: impl Into<EventId>,
    ) -> Self {
        self.transition_with(from, to, on, TransitionOptions::default())
    }

    pub fn transition_with(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        on: impl Into<EventId>,
        options: TransitionOptions,
    ) -> Self {
        self.transitions.push(PendingTransition {
            from: from.into(),
            to: to.into(),
            on: on.into(),
            options,
        });
        self
    }

    /// Register an event response on this state.
    pub fn respond(mut self, on: impl Into<EventId>, response: EventResponse) -> Self {
        self.responses.push((on.into(), response));
        self
    }

    /// Build the state tree.
    /// Returns the first structural or identifier error encountered.
    pub fn build(self) -> Result<State, StateError> {
        let mut pending = Vec::new();
        let state = self.assemble(&mut pending)?;

        for (state, hooks) in pending {
            for behavior in hooks.enter {
                state.add_enter_behavior(behavior);
            }
            for behavior in hooks.update {
                state.add_update_behavior(behavior);
            }
            for behavior in hooks.exit {
                state.add_exit_behavior(behavior);
            }
        }
        Ok(state)
    }

    /// Build the state tree and wrap it in a [`Machine`].
    pub fn build_machine(self) -> Result<Machine, StateError> {
        self.build().map(Machine::from_state)
    }

    fn assemble(self, pending: &mut Vec<(State, Hooks)>) -> Result<State, StateError> {
        let StateBuilder {
            id,
            hooks,
            children,
            transitions,
            responses,
        } = self;

        let state = State::new(id)?;
        for child in children {
            let child = child.assemble(pending)?;
            state.add_child(&child)?;
        }
        for t in transitions {
            state.add_transition_with(t.from, t.to, t.on, t.options)?;
        }
        state.event_responses_mut().extend(responses);

        pending.push((state.clone(), hooks));
        Ok(state)
    }
}
