//! Playback through an external synthesizer.
//!
//! Playing a file means running `fluidsynth` as a blocking subprocess with a
//! soundbank; this crate does not render audio itself.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{SongError, SongResult};

/// Sample rate passed to fluidsynth.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Environment variable overriding the fluidsynth executable.
pub const FLUIDSYNTH_PATH_ENV: &str = "FLUIDSYNTH_PATH";

/// Plays a written file with a soundbank, blocking until playback ends.
pub trait Player {
    fn play(&self, path: &Path, soundbank: &Path) -> SongResult<()>;
}

/// [`Player`] that shells out to `fluidsynth`.
#[derive(Debug, Clone)]
pub struct FluidSynthPlayer {
    /// Explicit executable, checked before the environment and `PATH`.
    pub binary: Option<PathBuf>,
    /// Output sample rate.
    pub sample_rate: u32,
}

impl Default for FluidSynthPlayer {
    fn default() -> Self {
        Self {
            binary: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl FluidSynthPlayer {
    /// Finds the fluidsynth executable.
    fn find_fluidsynth(&self) -> SongResult<PathBuf> {
        if let Some(ref path) = self.binary {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        if let Ok(path) = std::env::var(FLUIDSYNTH_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        let names = if cfg!(windows) {
            vec!["fluidsynth.exe", "fluidsynth"]
        } else {
            vec!["fluidsynth"]
        };

        for name in names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        Err(SongError::PlayerNotFound)
    }

    /// Command line for one playback, without spawning it.
    fn command(&self, binary: &Path, path: &Path, soundbank: &Path) -> Command {
        // fluidsynth -ni <soundbank> <midi> -r <rate>
        let mut cmd = Command::new(binary);
        cmd.arg("-ni")
            .arg(soundbank)
            .arg(path)
            .arg("-r")
            .arg(self.sample_rate.to_string());
        cmd
    }
}

impl Player for FluidSynthPlayer {
    fn play(&self, path: &Path, soundbank: &Path) -> SongResult<()> {
        if !soundbank.exists() {
            return Err(SongError::SoundbankNotFound(soundbank.to_path_buf()));
        }
        let binary = self.find_fluidsynth()?;

        tracing::info!(
            player = %binary.display(),
            file = %path.display(),
            soundbank = %soundbank.display(),
            "starting playback"
        );
        let status = self
            .command(&binary, path, soundbank)
            .status()
            .map_err(SongError::PlayerSpawn)?;

        if !status.success() {
            return Err(SongError::PlayerFailed(status.code().unwrap_or(-1)));
        }
        Ok(())
    }
}
