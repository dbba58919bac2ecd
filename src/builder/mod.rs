//! Builder API for declarative state tree construction.
//!
//! Builders describe a tree up front and validate it in one pass, which keeps
//! setup code readable for deeply nested machines.
//!
//! # Example
//!
//! ```
//! use statetree::builder::StateBuilder;
//! use statetree::EventResponse;
//!
//! let root = StateBuilder::new("menu")
//!     .child(StateBuilder::new("main"))
//!     .respond("back", EventResponse::consuming(|| println!("nothing to go back to")))
//!     .build()
//!     .unwrap();
//! ```

pub mod state;

pub use state::StateBuilder;
