//! Transition records and event responses.

use super::behavior::Behavior;
use super::guard::Guard;
use super::id::StateId;

/// A registered transition between two children of a state.
///
/// The record is keyed in its owner's table by [`TransitionId`](super::TransitionId),
/// so it only carries what happens once the key matches.
#[derive(Clone, Debug)]
pub struct Transition {
    pub(crate) target: StateId,
    pub(crate) guard: Option<Guard>,
    pub(crate) behavior: Option<Behavior>,
    pub(crate) shallow: bool,
}

impl Transition {
    /// Child that becomes active when the transition fires.
    pub fn target(&self) -> &StateId {
        &self.target
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    pub fn behavior(&self) -> Option<&Behavior> {
        self.behavior.as_ref()
    }

    /// Shallow transitions run only the two siblings' own exit and enter
    /// callbacks; deep ones walk their whole active subtrees.
    pub fn is_shallow(&self) -> bool {
        self.shallow
    }

    /// Whether the guard (if any) currently allows the transition.
    pub(crate) fn can_fire(&self) -> bool {
        self.guard.as_ref().is_none_or(Guard::check)
    }
}

/// Optional parts of a transition, set with a fluent API.
///
/// Defaults to an unguarded shallow transition with no side effect.
///
/// # Example
///
/// ```rust
/// use statetree::core::TransitionOptions;
///
/// let options = TransitionOptions::new()
///     .when(|| true)
///     .then(|| println!("moving"))
///     .deep();
/// ```
#[derive(Clone, Debug)]
pub struct TransitionOptions {
    pub(crate) guard: Option<Guard>,
    pub(crate) behavior: Option<Behavior>,
    pub(crate) shallow: bool,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self {
            guard: None,
            behavior: None,
            shallow: true,
        }
    }

    /// Set the guard.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the guard from a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the side effect run between exiting the origin and entering the target.
    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Set the side effect from a closure.
    pub fn then<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.behavior = Some(Behavior::new(callback));
        self
    }

    pub fn shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    /// Exit and enter the full active subtrees.
    pub fn deep(self) -> Self {
        self.shallow(false)
    }

    pub(crate) fn into_transition(self, target: StateId) -> Transition {
        Transition {
            target,
            guard: self.guard,
            behavior: self.behavior,
            shallow: self.shallow,
        }
    }
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Reaction of a state to an event that does not change the active child.
#[derive(Clone, Debug)]
pub struct EventResponse {
    pub behavior: Behavior,
    /// Whether handling the event stops further propagation.
    pub consume: bool,
}

impl EventResponse {
    pub fn new(behavior: Behavior, consume: bool) -> Self {
        Self { behavior, consume }
    }

    /// Response that handles the event and stops propagation.
    pub fn consuming<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(Behavior::new(callback), true)
    }

    /// Response that reacts but lets the event keep propagating.
    pub fn passing<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(Behavior::new(callback), false)
    }
}
