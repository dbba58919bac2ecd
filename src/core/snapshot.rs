//! Serializable snapshots of a state tree.
//!
//! A snapshot records structure and pointers only. Callbacks, guards and
//! responses are not serializable and are represented by their keys.

use super::id::{EventId, StateId, TransitionId};
use super::state::State;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a state and its descendants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub id: StateId,
    pub active: Option<StateId>,
    pub default: Option<StateId>,
    /// Transition keys, sorted.
    pub transitions: Vec<TransitionId>,
    /// Events with a registered response, sorted.
    pub responses: Vec<EventId>,
    /// Children in attachment order.
    pub children: Vec<StateSnapshot>,
}

impl StateSnapshot {
    /// Find a snapshot anywhere in this subtree by id.
    pub fn find(&self, id: &str) -> Option<&StateSnapshot> {
        if self.id.as_str() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

impl State {
    pub fn snapshot(&self) -> StateSnapshot {
        let (active, default, mut transitions, mut responses, children) = {
            let node = self.inner.node.borrow();
            (
                node.active.clone(),
                node.default.clone(),
                node.transitions.keys().cloned().collect::<Vec<_>>(),
                node.event_responses.keys().cloned().collect::<Vec<_>>(),
                node.children.clone(),
            )
        };
        transitions.sort();
        responses.sort();

        StateSnapshot {
            id: self.id().clone(),
            active,
            default,
            transitions,
            responses,
            children: children.iter().map(State::snapshot).collect(),
        }
    }
}
