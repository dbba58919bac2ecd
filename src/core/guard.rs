//! Guard predicates for controlling transitions.
//!
//! A guard is evaluated when its transition is looked up. A failing guard
//! does not consume the event, so the owning state still gets to try its
//! event responses.

use std::fmt;
use std::rc::Rc;

/// Predicate that decides whether a transition may fire.
///
/// # Example
///
/// ```rust
/// use statetree::core::Guard;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let coins = Rc::new(Cell::new(0));
/// let paid = {
///     let coins = Rc::clone(&coins);
///     Guard::new(move || coins.get() >= 2)
/// };
///
/// assert!(!paid.check());
/// coins.set(2);
/// assert!(paid.check());
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Rc<dyn Fn() -> bool>,
}

impl Guard {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
