//! Enter, update and exit traversals over the active branch.
//!
//! Enter and update run a state's own callbacks before descending into its
//! active child. Exit descends first, so inner states leave before outer ones.

use super::behavior::Behavior;
use super::state::State;

impl State {
    pub(crate) fn enter_branch(&self) {
        self.enter_self();
        if let Some(child) = self.active_child() {
            child.enter_branch();
        }
    }

    pub(crate) fn update_branch(&self) {
        self.update_self();
        if let Some(child) = self.active_child() {
            child.update_branch();
        }
    }

    pub(crate) fn exit_branch(&self) {
        if let Some(child) = self.active_child() {
            child.exit_branch();
        }
        self.exit_self();
    }

    pub(crate) fn enter_self(&self) {
        let behaviors = self.inner.node.borrow().on_enter.snapshot();
        run(behaviors);
    }

    pub(crate) fn update_self(&self) {
        let behaviors = self.inner.node.borrow().on_update.snapshot();
        run(behaviors);
    }

    pub(crate) fn exit_self(&self) {
        let behaviors = self.inner.node.borrow().on_exit.snapshot();
        run(behaviors);
    }
}

fn run(behaviors: Vec<Behavior>) {
    for behavior in behaviors {
        behavior.call();
    }
}
