//! End-to-end scenarios for nested states, transitions and propagation.

use statetree::core::{Behavior, EventId, EventResponse, TransitionOptions};
use statetree::{Machine, State};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn state(id: &str) -> State {
    State::new(id).unwrap()
}

/// Register enter/exit logging on `state`.
fn trace(state: &State, log: &Log) {
    let id = state.id().to_string();
    let enter = {
        let (log, id) = (Rc::clone(log), id.clone());
        Behavior::new(move || log.borrow_mut().push(format!("enter {id}")))
    };
    let exit = {
        let log = Rc::clone(log);
        Behavior::new(move || log.borrow_mut().push(format!("exit {id}")))
    };
    state.add_enter_behavior(enter).add_exit_behavior(exit);
}

fn respond(state: &State, event: &str, log: &Log, consume: bool) {
    let log = Rc::clone(log);
    let entry = format!("{} handled {}", state.id(), event);
    state.event_responses_mut().insert(
        EventId::new(event),
        EventResponse::new(Behavior::new(move || log.borrow_mut().push(entry.clone())), consume),
    );
}

#[test]
fn unguarded_transition_moves_active_child() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    machine
        .root()
        .add_children([&a, &b])
        .unwrap()
        .add_transition("a", "b", "go")
        .unwrap();
    trace(&a, &log);
    trace(&b, &log);
    machine.enter();
    log.borrow_mut().clear();

    assert!(machine.root().fire_event("go"));

    assert_eq!(machine.root().active_child_id().unwrap().as_str(), "b");
    assert_eq!(*log.borrow(), vec!["exit a", "enter b"]);
}

#[test]
fn machine_that_was_never_entered_stays_silent() {
    let log = Log::default();
    let machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    machine
        .root()
        .add_children([&a, &b])
        .unwrap()
        .add_transition("a", "b", "go")
        .unwrap();
    trace(machine.root(), &log);
    trace(&a, &log);
    trace(&b, &log);
    respond(&a, "ping", &log, true);
    respond(machine.root(), "ping", &log, true);

    assert!(!machine.send_event("go"));
    assert!(!machine.bubble_event("go"));
    assert!(!machine.send_event("ping"));
    assert!(!machine.bubble_event("ping"));

    assert!(log.borrow().is_empty());
}

#[test]
fn three_level_branch_enters_outside_in_and_exits_inside_out() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let child = state("child");
    let grandchild = state("grandchild");
    child.add_child(&grandchild).unwrap();
    machine.root().add_child(&child).unwrap();
    for s in [machine.root(), &child, &grandchild] {
        trace(s, &log);
    }

    machine.enter();
    machine.exit();

    assert_eq!(
        *log.borrow(),
        vec![
            "enter root",
            "enter child",
            "enter grandchild",
            "exit grandchild",
            "exit child",
            "exit root",
        ]
    );
}

/// root -> {a -> {a1}, b -> {b1}}, all traced, machine entered, log cleared.
fn siblings_with_children(log: &Log, options: TransitionOptions) -> Machine {
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    a.add_child(&state("a1")).unwrap();
    b.add_child(&state("b1")).unwrap();
    machine
        .root()
        .add_children([&a, &b])
        .unwrap()
        .add_transition_with("a", "b", "go", options)
        .unwrap();
    for s in [&a, &b] {
        trace(s, log);
        trace(&s.children()[0], log);
    }
    machine.enter();
    log.borrow_mut().clear();
    machine
}

#[test]
fn shallow_transition_touches_only_the_siblings() {
    let log = Log::default();
    let machine = siblings_with_children(&log, TransitionOptions::new());

    assert!(machine.send_event("go"));

    assert_eq!(*log.borrow(), vec!["exit a", "enter b"]);
}

#[test]
fn deep_transition_walks_both_subtrees() {
    let log = Log::default();
    let machine = siblings_with_children(&log, TransitionOptions::new().deep());

    assert!(machine.send_event("go"));

    assert_eq!(*log.borrow(), vec!["exit a1", "exit a", "enter b", "enter b1"]);
}

#[test]
fn transition_behavior_runs_between_exit_and_enter() {
    let log = Log::default();
    let behavior_log = Rc::clone(&log);
    let options =
        TransitionOptions::new().then(move || behavior_log.borrow_mut().push("moving".into()));
    let machine = siblings_with_children(&log, options);

    machine.send_event("go");

    assert_eq!(*log.borrow(), vec!["exit a", "moving", "enter b"]);
}

#[test]
fn guarded_transition_consumes_only_when_guard_passes() {
    let log = Log::default();
    let open = Rc::new(RefCell::new(false));
    let guard_open = Rc::clone(&open);
    let machine = siblings_with_children(
        &log,
        TransitionOptions::new().when(move || *guard_open.borrow()),
    );

    assert!(!machine.send_event("go"));
    assert_eq!(machine.active_path().last().unwrap().as_str(), "a1");

    *open.borrow_mut() = true;
    assert!(machine.send_event("go"));
    assert_eq!(machine.root().active_child_id().unwrap().as_str(), "b");
}

#[test]
fn consumed_transition_halts_bubbling() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let outer = state("outer");
    let x = state("x");
    let y = state("y");
    outer
        .add_children([&x, &y])
        .unwrap()
        .add_transition("x", "y", "go")
        .unwrap();
    machine.root().add_child(&outer).unwrap();
    respond(machine.root(), "go", &log, true);
    machine.enter();

    assert!(machine.bubble_event("go"));

    assert_eq!(outer.active_child_id().unwrap().as_str(), "y");
    assert!(log.borrow().is_empty());
}

#[test]
fn bubbling_reaches_parent_transitions() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    let a1 = state("a1");
    a.add_child(&a1).unwrap();
    machine
        .root()
        .add_children([&a, &b])
        .unwrap()
        .add_transition("a", "b", "go")
        .unwrap();
    respond(&a1, "go", &log, false);
    machine.enter();

    assert!(machine.bubble_event("go"));

    assert_eq!(*log.borrow(), vec!["a1 handled go"]);
    assert_eq!(machine.root().active_child_id().unwrap().as_str(), "b");
}

#[test]
fn drilling_consults_descendants_not_the_caller() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let a1 = state("a1");
    a.add_child(&a1).unwrap();
    machine.root().add_child(&a).unwrap();
    respond(&a, "ping", &log, false);
    respond(&a1, "ping", &log, true);
    machine.enter();

    assert!(machine.root().drill_event("ping"));
    assert_eq!(*log.borrow(), vec!["a handled ping", "a1 handled ping"]);

    log.borrow_mut().clear();
    assert!(a.drill_event("ping"));
    assert_eq!(*log.borrow(), vec!["a1 handled ping"]);
}

#[test]
fn send_event_prefers_root_transition_over_drilling() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    machine
        .root()
        .add_children([&a, &b])
        .unwrap()
        .add_transition("a", "b", "go")
        .unwrap();
    respond(&a, "go", &log, true);
    machine.enter();

    assert!(machine.send_event("go"));

    assert!(log.borrow().is_empty());
    assert_eq!(machine.root().active_child_id().unwrap().as_str(), "b");
}

#[test]
fn events_fired_at_inactive_branches_are_ignored() {
    let log = Log::default();
    let root = state("root");
    let a = state("a");
    let b = state("b");
    let b1 = state("b1");
    b.add_child(&b1).unwrap();
    root.add_children([&a, &b]).unwrap();
    respond(&b, "ping", &log, true);
    respond(&root, "ping", &log, true);

    // b1 is active within b, but b is not active within root.
    assert!(!b1.fire_event("ping"));
    assert!(!b.fire_event("ping"));
    assert!(!b.drill_event("ping"));
    assert!(log.borrow().is_empty());
}

#[test]
fn removing_active_child_reenters_default_branch() {
    let log = Log::default();
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    let a1 = state("a1");
    a.add_child(&a1).unwrap();
    machine
        .root()
        .add_children([&a, &b])
        .unwrap()
        .add_transition("a", "b", "go")
        .unwrap();
    trace(&a, &log);
    trace(&a1, &log);
    trace(&b, &log);
    machine.enter();
    machine.send_event("go");
    log.borrow_mut().clear();

    machine.root().remove_child("b").unwrap();

    assert_eq!(*log.borrow(), vec!["enter a", "enter a1"]);
    assert!(b.parent().is_none());
    assert!(machine.root().transitions().is_empty());
}

#[test]
fn callback_may_dispatch_into_the_tree() {
    let mut machine = Machine::new("root").unwrap();
    let a = state("a");
    let b = state("b");
    let c = state("c");
    machine
        .root()
        .add_children([&a, &b, &c])
        .unwrap()
        .add_transition("a", "b", "go")
        .unwrap()
        .add_transition("b", "c", "next")
        .unwrap();
    let root = machine.root().clone();
    b.add_enter_behavior(Behavior::new(move || {
        root.fire_event("next");
    }));
    machine.enter();

    assert!(machine.send_event("go"));

    assert_eq!(machine.root().active_child_id().unwrap().as_str(), "c");
}
