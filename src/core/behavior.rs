//! Callback handles and ordered callback lists.

use std::fmt;
use std::rc::Rc;

/// A callback registered against a state.
///
/// Cloning a `Behavior` yields another handle to the same callback, and
/// removal matches on that identity. A behavior passed inline and never kept
/// by the caller therefore cannot be removed later.
///
/// # Example
///
/// ```rust
/// use statetree::core::{Behavior, State};
///
/// let state = State::new("idle").unwrap();
/// let log = Behavior::new(|| println!("entered idle"));
///
/// state.add_enter_behavior(log.clone());
/// state.remove_enter_behavior(&log);
/// ```
#[derive(Clone)]
pub struct Behavior(Rc<dyn Fn()>);

impl Behavior {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self(Rc::new(callback))
    }

    pub fn call(&self) {
        (self.0)()
    }

    /// Whether both handles point at the same registered callback.
    pub fn same_as(&self, other: &Behavior) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behavior({:p})", Rc::as_ptr(&self.0))
    }
}

/// Ordered multi-subscriber list, invoked in subscription order.
#[derive(Clone, Debug, Default)]
pub(crate) struct BehaviorList {
    behaviors: Vec<Behavior>,
}

impl BehaviorList {
    pub(crate) fn push(&mut self, behavior: Behavior) {
        self.behaviors.push(behavior);
    }

    /// Remove the most recent registration of `behavior`. Returns whether one was found.
    pub(crate) fn remove(&mut self, behavior: &Behavior) -> bool {
        match self.behaviors.iter().rposition(|b| b.same_as(behavior)) {
            Some(index) => {
                self.behaviors.remove(index);
                true
            }
            None => false,
        }
    }

    /// Clone of the current handles, so callers can release their borrow before invoking.
    pub(crate) fn snapshot(&self) -> Vec<Behavior> {
        self.behaviors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn clones_share_identity() {
        let behavior = Behavior::new(|| {});
        let other = Behavior::new(|| {});

        assert!(behavior.same_as(&behavior.clone()));
        assert!(!behavior.same_as(&other));
    }

    #[test]
    fn list_invokes_in_subscription_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut list = BehaviorList::default();
        for n in 0..3 {
            let calls = Rc::clone(&calls);
            list.push(Behavior::new(move || calls.borrow_mut().push(n)));
        }

        for behavior in list.snapshot() {
            behavior.call();
        }

        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn remove_drops_latest_matching_registration() {
        let kept = Behavior::new(|| {});
        let mut list = BehaviorList::default();
        list.push(kept.clone());
        list.push(Behavior::new(|| {}));
        list.push(kept.clone());

        assert!(list.remove(&kept));
        assert_eq!(list.snapshot().len(), 2);
        assert!(list.snapshot()[0].same_as(&kept));
        assert!(!list.snapshot()[1].same_as(&kept));
    }

    #[test]
    fn removing_unknown_behavior_is_a_no_op() {
        let mut list = BehaviorList::default();
        list.push(Behavior::new(|| {}));

        assert!(!list.remove(&Behavior::new(|| {})));
        assert_eq!(list.snapshot().len(), 1);
    }
}
