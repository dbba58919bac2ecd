//! The state node: child ownership, transition table and event propagation.
//!
//! A [`State`] is a cheap handle to a node. Cloning it yields another handle
//! to the same node. A node owns its children through the handles in its
//! child list; the back-reference to the parent is weak and is used only for
//! upward lookups.
//!
//! No internal borrow is held while user callbacks run, so callbacks may call
//! back into the tree. Mutating the tree from inside a callback is allowed
//! but its outcome is not guaranteed to be consistent. In particular, if a
//! callback removes a transition's target, the origin child keeps the active
//! slot without being re-entered even though its exit callbacks already ran,
//! so a later exit runs them a second time.

use super::behavior::{Behavior, BehaviorList};
use super::error::StateError;
use super::id::{EventId, StateId, TransitionId};
use super::transition::{EventResponse, Transition, TransitionOptions};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

pub(super) struct Inner {
    pub(super) id: StateId,
    pub(super) node: RefCell<Node>,
}

#[derive(Default)]
pub(super) struct Node {
    pub(super) parent: Weak<Inner>,
    pub(super) children: Vec<State>,
    pub(super) active: Option<StateId>,
    pub(super) default: Option<StateId>,
    pub(super) transitions: HashMap<TransitionId, Transition>,
    pub(super) event_responses: HashMap<EventId, EventResponse>,
    pub(super) on_enter: BehaviorList,
    pub(super) on_update: BehaviorList,
    pub(super) on_exit: BehaviorList,
}

impl Node {
    pub(super) fn child(&self, id: &str) -> Option<State> {
        self.children.iter().find(|c| c.id().as_str() == id).cloned()
    }

    pub(super) fn active_child(&self) -> Option<State> {
        self.active.as_ref().and_then(|id| self.child(id.as_str()))
    }
}

/// A node in a hierarchical state machine.
///
/// # Example
///
/// ```rust
/// use statetree::core::State;
///
/// let root = State::new("root").unwrap();
/// let idle = State::new("idle").unwrap();
/// let busy = State::new("busy").unwrap();
///
/// root.add_children([&idle, &busy])
///     .unwrap()
///     .add_transition("idle", "busy", "work")
///     .unwrap();
///
/// assert!(root.fire_event("work"));
/// assert_eq!(root.active_child_id().unwrap().as_str(), "busy");
/// ```
#[derive(Clone)]
pub struct State {
    pub(super) inner: Rc<Inner>,
}

impl State {
    /// Create a detached state, rejecting a blank identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, StateError> {
        Ok(Self::with_id(StateId::new(id)?))
    }

    pub fn with_id(id: StateId) -> Self {
        Self {
            inner: Rc::new(Inner {
                id,
                node: RefCell::new(Node::default()),
            }),
        }
    }

    pub fn id(&self) -> &StateId {
        &self.inner.id
    }

    pub fn parent(&self) -> Option<State> {
        self.inner
            .node
            .borrow()
            .parent
            .upgrade()
            .map(|inner| State { inner })
    }

    /// Whether both handles refer to the same node.
    pub fn same_node(&self, other: &State) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn ancestors(&self) -> impl Iterator<Item = State> {
        std::iter::successors(self.parent(), State::parent)
    }

    /// Attach `child` under this state.
    ///
    /// The first child attached to a state with no children becomes both its
    /// default and active child, and is entered immediately.
    pub fn add_child(&self, child: &State) -> Result<&Self, StateError> {
        if self.same_node(child) {
            return Err(StateError::SelfParenting {
                id: self.id().clone(),
            });
        }
        if let Some(parent) = child.parent() {
            return Err(StateError::AlreadyParented {
                child: child.id().clone(),
                parent: parent.id().clone(),
            });
        }
        if self.ancestors().any(|ancestor| ancestor.same_node(child)) {
            return Err(StateError::Cycle {
                child: child.id().clone(),
                parent: self.id().clone(),
            });
        }

        let first = {
            let mut node = self.inner.node.borrow_mut();
            if node.child(child.id().as_str()).is_some() {
                return Err(StateError::DuplicateChild {
                    child: child.id().clone(),
                    parent: self.id().clone(),
                });
            }
            node.children.push(child.clone());
            let first = node.children.len() == 1;
            if first {
                node.default = Some(child.id().clone());
                node.active = Some(child.id().clone());
            }
            first
        };
        child.inner.node.borrow_mut().parent = Rc::downgrade(&self.inner);
        tracing::debug!(parent = %self.id(), child = %child.id(), first, "attached child");

        if first {
            child.enter_branch();
        }
        Ok(self)
    }

    /// Attach each state in order. Stops at the first failure without undoing
    /// earlier attachments.
    pub fn add_children<'a, I>(&self, children: I) -> Result<&Self, StateError>
    where
        I: IntoIterator<Item = &'a State>,
    {
        for child in children {
            self.add_child(child)?;
        }
        Ok(self)
    }

    /// Detach the child named `id` and drop every transition that leaves from
    /// or leads to it.
    ///
    /// The default child can only be removed once it is the last child. If the
    /// removed child was active, the default child becomes active and is
    /// entered again. The removed subtree is not exited.
    pub fn remove_child(&self, id: impl AsRef<str>) -> Result<&Self, StateError> {
        let id = id.as_ref();
        let (removed, fallback) = {
            let mut node = self.inner.node.borrow_mut();
            let index = node
                .children
                .iter()
                .position(|c| c.id().as_str() == id)
                .ok_or_else(|| StateError::ChildNotFound {
                    child: id.to_string(),
                    parent: self.id().clone(),
                })?;
            let is_default = node.default.as_ref().is_some_and(|d| d.as_str() == id);
            if is_default && node.children.len() > 1 {
                return Err(StateError::DefaultChildRemoval {
                    child: node.children[index].id().clone(),
                    parent: self.id().clone(),
                });
            }

            let removed = node.children.remove(index);
            node.transitions
                .retain(|key, t| key.from.as_str() != id && t.target.as_str() != id);

            let mut fallback = None;
            if node.children.is_empty() {
                node.default = None;
                node.active = None;
            } else if node.active.as_ref().is_some_and(|a| a.as_str() == id) {
                node.active = node.default.clone();
                fallback = node.active_child();
            }
            (removed, fallback)
        };
        removed.inner.node.borrow_mut().parent = Weak::new();
        tracing::debug!(parent = %self.id(), child = %removed.id(), "detached child");

        if let Some(default) = fallback {
            default.enter_branch();
        }
        Ok(self)
    }

    /// Detach every child and drop the whole transition table.
    pub fn clear_children(&self) -> &Self {
        let children = {
            let mut node = self.inner.node.borrow_mut();
            node.transitions.clear();
            node.default = None;
            node.active = None;
            std::mem::take(&mut node.children)
        };
        for child in &children {
            child.inner.node.borrow_mut().parent = Weak::new();
        }
        tracing::debug!(parent = %self.id(), count = children.len(), "cleared children");
        self
    }

    /// Look up a direct child by id.
    pub fn get_child(&self, id: impl AsRef<str>) -> Result<State, StateError> {
        let id = id.as_ref();
        self.inner
            .node
            .borrow()
            .child(id)
            .ok_or_else(|| StateError::ChildNotFound {
                child: id.to_string(),
                parent: self.id().clone(),
            })
    }

    /// Current children in the order they were attached.
    pub fn children(&self) -> Vec<State> {
        self.inner.node.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.node.borrow().children.len()
    }

    pub fn active_child(&self) -> Option<State> {
        self.inner.node.borrow().active_child()
    }

    pub fn active_child_id(&self) -> Option<StateId> {
        self.inner.node.borrow().active.clone()
    }

    pub fn default_child(&self) -> Option<State> {
        let node = self.inner.node.borrow();
        node.default.as_ref().and_then(|id| node.child(id.as_str()))
    }

    pub fn default_child_id(&self) -> Option<StateId> {
        self.inner.node.borrow().default.clone()
    }

    /// The innermost state reached by following active children from here.
    pub fn active_leaf(&self) -> State {
        let mut current = self.clone();
        while let Some(child) = current.active_child() {
            current = child;
        }
        current
    }

    /// Ids from this state down to its active leaf, inclusive.
    pub fn active_path(&self) -> Vec<StateId> {
        let mut path = vec![self.id().clone()];
        let mut current = self.clone();
        while let Some(child) = current.active_child() {
            path.push(child.id().clone());
            current = child;
        }
        path
    }

    /// Register an unguarded shallow transition from child `from` to child
    /// `to`, taken when `on` reaches this state while `from` is active.
    pub fn add_transition(
        &self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        on: impl Into<EventId>,
    ) -> Result<&Self, StateError> {
        self.add_transition_with(from, to, on, TransitionOptions::default())
    }

    /// Register a transition with a guard, side effect or depth.
    ///
    /// A transition already registered for the same event and origin is replaced.
    pub fn add_transition_with(
        &self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        on: impl Into<EventId>,
        options: TransitionOptions,
    ) -> Result<&Self, StateError> {
        let on = on.into();
        let from = self.get_child(from)?.id().clone();
        let to = self.get_child(to)?.id().clone();
        if from == to {
            return Err(StateError::SelfTransition { id: from });
        }
        if on.is_blank() {
            return Err(StateError::BlankIdentifier { what: "event" });
        }

        let key = TransitionId::new(on, from);
        let shallow = options.shallow;
        let replaced = self
            .inner
            .node
            .borrow_mut()
            .transitions
            .insert(key.clone(), options.into_transition(to.clone()))
            .is_some();
        tracing::debug!(
            state = %self.id(),
            transition = %key,
            to = %to,
            shallow,
            replaced,
            "registered transition"
        );
        Ok(self)
    }

    /// Remove the transition for `on` leaving from `from`, if any.
    pub fn remove_transition(&self, on: impl AsRef<str>, from: impl AsRef<str>) -> &Self {
        let (on, from) = (on.as_ref(), from.as_ref());
        let removed = {
            let mut node = self.inner.node.borrow_mut();
            let before = node.transitions.len();
            node.transitions
                .retain(|key, _| !(key.event.as_str() == on && key.from.as_str() == from));
            before != node.transitions.len()
        };
        if removed {
            tracing::debug!(state = %self.id(), event = on, from, "removed transition");
        }
        self
    }

    /// Read-only view of the transition table.
    ///
    /// The view borrows the node; drop it before mutating or dispatching.
    pub fn transitions(&self) -> Ref<'_, HashMap<TransitionId, Transition>> {
        Ref::map(self.inner.node.borrow(), |node| &node.transitions)
    }

    pub fn event_responses(&self) -> Ref<'_, HashMap<EventId, EventResponse>> {
        Ref::map(self.inner.node.borrow(), |node| &node.event_responses)
    }

    /// Direct mutable access to the event-response table.
    ///
    /// The guard borrows the node; drop it before dispatching events.
    pub fn event_responses_mut(&self) -> RefMut<'_, HashMap<EventId, EventResponse>> {
        RefMut::map(self.inner.node.borrow_mut(), |node| &mut node.event_responses)
    }

    pub fn add_enter_behavior(&self, behavior: Behavior) -> &Self {
        self.inner.node.borrow_mut().on_enter.push(behavior);
        self
    }

    pub fn remove_enter_behavior(&self, behavior: &Behavior) -> &Self {
        self.inner.node.borrow_mut().on_enter.remove(behavior);
        self
    }

    pub fn add_update_behavior(&self, behavior: Behavior) -> &Self {
        self.inner.node.borrow_mut().on_update.push(behavior);
        self
    }

    pub fn remove_update_behavior(&self, behavior: &Behavior) -> &Self {
        self.inner.node.borrow_mut().on_update.remove(behavior);
        self
    }

    pub fn add_exit_behavior(&self, behavior: Behavior) -> &Self {
        self.inner.node.borrow_mut().on_exit.push(behavior);
        self
    }

    pub fn remove_exit_behavior(&self, behavior: &Behavior) -> &Self {
        self.inner.node.borrow_mut().on_exit.remove(behavior);
        self
    }

    /// True when this state has a parent whose active child is someone else.
    fn is_stale(&self) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        let active = parent.inner.node.borrow().active.clone();
        active.as_ref() != Some(self.id())
    }

    /// Try the transition keyed by `event` and the current active child.
    ///
    /// If an exit callback or the transition behavior removes the target, the
    /// transition still counts as taken. The origin stays active but is not
    /// re-entered.
    pub(crate) fn try_transition(&self, event: &str) -> bool {
        let (key, transition, current) = {
            let node = self.inner.node.borrow();
            let Some(active) = node.active.clone() else {
                return false;
            };
            let key = TransitionId::new(EventId::new(event), active);
            let Some(transition) = node.transitions.get(&key).cloned() else {
                return false;
            };
            (key, transition, node.active_child())
        };

        if !transition.can_fire() {
            tracing::trace!(state = %self.id(), transition = %key, "guard rejected transition");
            return false;
        }

        if let Some(current) = current {
            if transition.shallow {
                current.exit_self();
            } else {
                current.exit_branch();
            }
        }
        if let Some(behavior) = &transition.behavior {
            behavior.call();
        }

        let next = {
            let mut node = self.inner.node.borrow_mut();
            let next = node.child(transition.target.as_str());
            if next.is_some() {
                node.active = Some(transition.target.clone());
            }
            next
        };
        let Some(next) = next else {
            tracing::warn!(
                state = %self.id(),
                transition = %key,
                to = %transition.target,
                "transition target was removed while transitioning"
            );
            return true;
        };

        if transition.shallow {
            next.enter_self();
        } else {
            next.enter_branch();
        }
        tracing::debug!(
            state = %self.id(),
            event,
            from = %key.from,
            to = %transition.target,
            shallow = transition.shallow,
            "transition taken"
        );
        true
    }

    /// Invoke this state's own response to `event`; returns its consume flag.
    pub(crate) fn try_response(&self, event: &str) -> bool {
        let response = self.inner.node.borrow().event_responses.get(event).cloned();
        match response {
            Some(response) => {
                tracing::trace!(state = %self.id(), event, consume = response.consume, "event response");
                response.behavior.call();
                response.consume
            }
            None => false,
        }
    }

    /// Offer `event` to this state and then to each ancestor in turn.
    ///
    /// Each state tries its own transition table (keyed by its own active
    /// child) and then its event responses. Returns whether the event was
    /// consumed. A state that is not its parent's active child ignores the
    /// event.
    ///
    /// A transition whose target is removed by one of its own callbacks still
    /// consumes the event. The previous active child keeps its slot with its
    /// exit callbacks already run, so exiting the tree later runs them again.
    pub fn fire_event(&self, event: impl AsRef<str>) -> bool {
        let event = event.as_ref();
        if self.is_stale() {
            tracing::trace!(state = %self.id(), event, "ignored event on inactive state");
            return false;
        }
        if self.try_transition(event) || self.try_response(event) {
            return true;
        }
        match self.parent() {
            Some(parent) => parent.fire_event(event),
            None => {
                tracing::trace!(state = %self.id(), event, "event dropped at root");
                false
            }
        }
    }

    /// Offer `event` down the active branch below this state.
    ///
    /// This state's own table and responses are never consulted; each active
    /// descendant, outermost first, gets a chance to consume it.
    pub fn drill_event(&self, event: impl AsRef<str>) -> bool {
        let event = event.as_ref();
        if self.is_stale() {
            tracing::trace!(state = %self.id(), event, "ignored event on inactive state");
            return false;
        }
        let Some(child) = self.active_child() else {
            return false;
        };
        if child.try_transition(event) || child.try_response(event) {
            return true;
        }
        child.drill_event(event)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.inner.node.borrow();
        let children: Vec<&str> = node.children.iter().map(|c| c.id().as_str()).collect();
        f.debug_struct("State")
            .field("id", &self.inner.id)
            .field("active", &node.active)
            .field("default", &node.default)
            .field("children", &children)
            .field("transitions", &node.transitions.len())
            .finish()
    }
}
