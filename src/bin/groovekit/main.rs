//! groovekit - terminal DAW harness
//!
//! Run with: cargo run
//!
//! Spawns the audio stream, then drives a terminal UI that plays the synth
//! from the keyboard, toggles effects, and records note takes against the
//! running playhead.

mod app;
mod keys;
mod ui;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    App::new().run()
}
