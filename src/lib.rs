//! Statetree: a hierarchical state machine engine
//!
//! Statetree composes nested, mutually exclusive states into a tree, wires
//! conditional transitions between siblings and dispatches events through the
//! active branch with deterministic entry and exit ordering.
//!
//! # Core Concepts
//!
//! - **State**: A node that owns its children and a transition table keyed by
//!   event and origin child
//! - **Active branch**: Each state has one active child; following them from
//!   the root gives the current configuration
//! - **Transitions**: Move a state's active child, optionally guarded, shallow
//!   (only the two siblings) or deep (their whole active subtrees)
//! - **Event responses**: Side effects that may or may not consume an event
//! - **Propagation**: Events either bubble up from a state through its
//!   ancestors or drill down from a state through its active descendants
//! - **Machine**: Root wrapper with idempotent enter/exit and event injection
//!
//! The engine is single-threaded and synchronous. Every call runs to
//! completion before returning.
//!
//! # Example
//!
//! ```rust
//! use statetree::core::{Behavior, TransitionOptions};
//! use statetree::{Machine, State};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let note = |entry: &'static str| {
//!     let log = Rc::clone(&log);
//!     Behavior::new(move || log.borrow_mut().push(entry))
//! };
//!
//! let mut machine = Machine::new("root").unwrap();
//! let a = State::new("a").unwrap();
//! let b = State::new("b").unwrap();
//! a.add_exit_behavior(note("exit a"));
//! b.add_enter_behavior(note("enter b"));
//!
//! machine
//!     .root()
//!     .add_children([&a, &b])
//!     .unwrap()
//!     .add_transition_with("a", "b", "go", TransitionOptions::new())
//!     .unwrap();
//!
//! machine.enter();
//! assert!(machine.send_event("go"));
//! assert_eq!(*log.borrow(), vec!["exit a", "enter b"]);
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{
    Behavior, EventId, EventResponse, Guard, State, StateError, StateId, TransitionOptions,
};
pub use machine::Machine;
