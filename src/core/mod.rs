//! The hierarchical state engine.
//!
//! This module contains the state tree and everything it is built from:
//! - Identifiers for states, events and transitions
//! - The `State` node with its mutation API and event propagation
//! - Guards, behaviors and event responses
//! - Lifecycle traversal over the active branch
//! - Serializable snapshots for inspection

mod behavior;
mod error;
mod guard;
mod id;
mod lifecycle;
mod snapshot;
mod state;
mod transition;

pub use behavior::Behavior;
pub use error::{ErrorKind, StateError};
pub use guard::Guard;
pub use id::{EventId, StateId, TransitionId};
pub use snapshot::StateSnapshot;
pub use state::State;
pub use transition::{EventResponse, Transition, TransitionOptions};
