//! Traffic Light
//!
//! This example demonstrates nested states driven by a timer tick.
//!
//! Key concepts:
//! - A composite `operating` state with its own cycle of child states
//! - A guarded transition that only fires after enough ticks
//! - A deep transition into `maintenance` that exits the whole active branch
//! - Logging through `tracing` (try `RUST_LOG=statetree=debug`)
//!
//! Run with: cargo run --example traffic_light

use statetree::builder::StateBuilder;
use statetree::core::TransitionOptions;
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light ===\n");

    let ticks = Rc::new(Cell::new(0u32));
    let reset = |ticks: &Rc<Cell<u32>>| {
        let ticks = Rc::clone(ticks);
        move || ticks.set(0)
    };
    let after = |ticks: &Rc<Cell<u32>>, n: u32| {
        let ticks = Rc::clone(ticks);
        TransitionOptions::new().when(move || ticks.get() >= n)
    };

    let operating = StateBuilder::new("operating")
        .on_exit(|| println!("  [operating] lights off"))
        .child(StateBuilder::new("red").on_enter(reset(&ticks)))
        .child(StateBuilder::new("green").on_enter(reset(&ticks)))
        .child(StateBuilder::new("yellow").on_enter(reset(&ticks)))
        .transition_with("red", "green", "tick", after(&ticks, 3))
        .transition_with("green", "yellow", "tick", after(&ticks, 3))
        .transition_with("yellow", "red", "tick", after(&ticks, 1));

    let mut machine = StateBuilder::new("light")
        .child(operating)
        .child(StateBuilder::new("maintenance").on_enter(|| println!("  [maintenance] flashing")))
        .transition_with(
            "operating",
            "maintenance",
            "fault",
            TransitionOptions::new().deep(),
        )
        .build_machine()
        .expect("traffic light tree is valid");

    machine.enter();

    let counter = Rc::clone(&ticks);
    machine
        .root()
        .get_child("operating")
        .expect("operating exists")
        .add_update_behavior(statetree::Behavior::new(move || {
            counter.set(counter.get() + 1)
        }));

    for _ in 0..8 {
        machine.update();
        machine.bubble_event("tick");
        println!("{}", render(&machine.active_path()));
    }

    println!("\nFault detected");
    machine.send_event("fault");
    println!("{}", render(&machine.active_path()));

    machine.exit();
    println!("\n=== Example Complete ===");
}

fn render(path: &[statetree::StateId]) -> String {
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}
