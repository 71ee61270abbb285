//! Play command implementation

use anyhow::{bail, Context, Result};
use colored::Colorize;
use datasong_core::{FluidSynthPlayer, Player};
use std::path::Path;
use std::process::ExitCode;

/// Run the play command
///
/// Blocks until the synthesizer exits.
pub fn run(midi_path: &Path, soundbank: &Path) -> Result<ExitCode> {
    play_with(&FluidSynthPlayer::default(), midi_path, soundbank)?;
    println!("{} {}", "Played:".green().bold(), midi_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Plays `midi_path` through any [`Player`].
pub fn play_with(player: &dyn Player, midi_path: &Path, soundbank: &Path) -> Result<()> {
    if !midi_path.is_file() {
        bail!("MIDI file not found: {}", midi_path.display());
    }
    player
        .play(midi_path, soundbank)
        .with_context(|| format!("Failed to play {}", midi_path.display()))
}
