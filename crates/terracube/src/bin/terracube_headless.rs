//! # TERRACUBE Headless
//!
//! Runs a scripted session without a window: loads the world configuration
//! and block catalog, walks a player east, digs and builds along the way and
//! reports what a renderer would have drawn.
//!
//! ```bash
//! # Default world
//! ./terracube_headless
//!
//! # Custom world
//! ./terracube_headless path/to/world.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use terracube::shared::{AIR, MAX_Y};
use terracube::GameSession;

/// Configuration used when no path is given.
const DEFAULT_CONFIG: &str = "data/world.toml";

/// Blocks walked between stops.
const STRIDE: f32 = 16.0;

/// Stops along the walk.
const STOPS: usize = 8;

/// Highest non-air Y in the column at `(x, z)`.
fn surface_y(session: &GameSession, x: f64, z: f64) -> Option<f64> {
    (0..=MAX_Y)
        .rev()
        .map(|y| y as f64)
        .find(|&y| session.world().block_at(x, y, z).is_some_and(|id| id != AIR))
}

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║           TERRACUBE HEADLESS SESSION                             ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    println!("Loading {}...", config_path.display());

    let start = Instant::now();
    let mut session = match GameSession::open(&config_path) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("✗ {err}");
            return ExitCode::FAILURE;
        }
    };
    session.refresh();
    println!(
        "✓ {} blocks registered, {} chunks resident ({:.1} ms)",
        session.registry().len(),
        session.world().store().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!();

    let mut mined = 0usize;
    let mut placed = 0usize;
    let mut position = session.player().position;

    println!("┌─ WALK ───────────────────────────────────────────────────────────┐");
    for stop in 0..STOPS {
        position = position.offset(STRIDE, 0.0, 0.0);
        let generated = session.move_player(position);

        let (x, z) = (f64::from(position.x), f64::from(position.z));
        let mut dug = String::from("-");
        if let Some(y) = surface_y(&session, x, z) {
            if let Some(name) = session.mine(x, y, z) {
                mined += 1;
                dug = name;
            }
            if session.place(x, y, z) {
                placed += 1;
            }
        }

        let changed = session.refresh().len();
        let visible = session.visible_total();
        session.tick();
        println!(
            "│ stop {stop}: x={:>6.1}  +{generated} chunks  {changed} refreshed  {visible:>6} visible  dug {dug}",
            position.x
        );
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let stats = session.world().stats();
    let blob = session.snapshot();
    let save_size = blob.to_json().map_or(0, |json| json.len());

    println!("┌─ RESULTS ────────────────────────────────────────────────────────┐");
    println!("│ Chunks generated:   {}", stats.chunks_generated);
    println!("│ Chunks restored:    {}", stats.chunks_restored);
    println!("│ Chunks evicted:     {}", stats.chunks_evicted);
    println!("│ Blocks mined:       {mined}");
    println!("│ Blocks placed:      {placed}");
    println!("│ Edits recorded:     {}", session.world().edits().edit_count());
    println!("│ Inventory slots:    {}", session.inventory().used_slots());
    println!("│ Time of day:        {}", session.time());
    println!("│ Save blob:          {save_size} bytes");
    println!("│ Total:              {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);
    println!("└──────────────────────────────────────────────────────────────────┘");

    ExitCode::SUCCESS
}
