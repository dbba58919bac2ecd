//! Door
//!
//! This example contrasts the two ways of injecting events.
//!
//! Key concepts:
//! - `bubble_event` starts at the innermost active state and walks upward
//! - `send_event` starts at the root and drills down the active branch
//! - Event responses that observe an event without consuming it
//!
//! Run with: cargo run --example door

use statetree::builder::StateBuilder;
use statetree::EventResponse;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Door ===\n");

    let closed = StateBuilder::new("closed")
        .child(StateBuilder::new("unlocked"))
        .child(StateBuilder::new("locked"))
        .transition("unlocked", "locked", "lock")
        .transition("locked", "unlocked", "unlock")
        .respond(
            "knock",
            EventResponse::passing(|| println!("  [closed] heard a knock")),
        );

    let mut machine = StateBuilder::new("door")
        .child(closed)
        .child(StateBuilder::new("open"))
        .transition("open", "closed", "close")
        .respond(
            "knock",
            EventResponse::consuming(|| println!("  [door] someone answers")),
        )
        .build_machine()
        .expect("door tree is valid");

    machine.enter();

    println!("bubble 'knock' (innermost first):");
    machine.bubble_event("knock");

    println!("send 'knock' (root first):");
    machine.send_event("knock");

    println!("\nsend 'lock': {}", machine.send_event("lock"));
    println!("active: {:?}", machine.active_path());

    machine.exit();
    println!("\n=== Example Complete ===");
}
