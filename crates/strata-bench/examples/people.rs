//! Arena walkthrough: store people's names, clear, reuse.
//!
//! Demonstrates: create arena → allocate strings → print stats → clear
//! (old blocks go stale) → allocate again → destroy.
//!
//! Run with `RUST_LOG=people=info,strata_arena=debug` to see demo and
//! chunk events.

use strata_arena::{Arena, ArenaError, Block};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// A person whose names live in an arena.
struct Person {
    first_name: Block,
    last_name: Block,
}

impl Person {
    fn new(arena: &mut Arena, first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: arena.alloc_str(first_name),
            last_name: arena.alloc_str(last_name),
        }
    }

    fn describe(&self, arena: &Arena) -> Result<String, ArenaError> {
        let first = String::from_utf8_lossy(arena.get(self.first_name)?).into_owned();
        let last = String::from_utf8_lossy(arena.get(self.last_name)?).into_owned();
        Ok(format!("Person(firstName=\"{first}\", lastName=\"{last}\")"))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Strata arena {} ===\n", strata_arena::version());

    let mut arena = Arena::new();
    info!(capacity = arena.capacity(), "arena ready");
    println!("{}", arena.stats());

    let garibaldi = Person::new(&mut arena, "Giuseppe", "Garibaldi");
    println!("{}", arena.stats());

    let emanuele = Person::new(&mut arena, "Vittorio", "Emanuele");
    println!("{}", arena.stats());

    for person in [&garibaldi, &emanuele] {
        match person.describe(&arena) {
            Ok(text) => println!("{text}"),
            Err(err) => println!("error: {err}"),
        }
    }

    arena.clear();
    info!(epoch = %arena.epoch(), "arena cleared, earlier blocks are stale");
    println!("{}", arena.stats());

    // Blocks from before the clear are rejected rather than read.
    if let Err(err) = garibaldi.describe(&arena) {
        warn!(%err, "stale person rejected");
        println!("after clear: {err}");
    }

    let benso = Person::new(&mut arena, "Camillo", "Benso");
    println!("{}", arena.stats());
    match benso.describe(&arena) {
        Ok(text) => println!("{text}"),
        Err(err) => println!("error: {err}"),
    }

    let stats = arena.destroy();
    info!(size = stats.size, chunks = stats.chunks, "arena destroyed");
    println!("\nfinal: {stats}");
}
