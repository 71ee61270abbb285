//! Generate command implementation
//!
//! Builds a pattern from the configured source, writes it as MIDI and
//! optionally plays it.

use anyhow::{Context, Result};
use colored::Colorize;
use datasong_core::{
    generate_song, FluidSynthPlayer, MidiSerializer, SongConfig, SourceConfig, SourceKind,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{exit_status, JsonError};

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOverrides {
    pub output: Option<PathBuf>,
    pub notes_limit: Option<usize>,
    pub number_of_tracks: Option<usize>,
    pub min_pitch: Option<i32>,
    pub pitch_range: Option<f64>,
    pub source: Option<SourceConfig>,
    pub seed: Option<u32>,
    pub play: bool,
    pub soundbank: Option<PathBuf>,
}

impl GenerateOverrides {
    /// Applies every set override to `config`.
    pub fn apply(self, config: &mut SongConfig) {
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(notes_limit) = self.notes_limit {
            config.notes_limit = notes_limit;
        }
        if let Some(number_of_tracks) = self.number_of_tracks {
            config.number_of_tracks = number_of_tracks;
        }
        if let Some(min_pitch) = self.min_pitch {
            config.min_pitch = min_pitch;
        }
        if let Some(pitch_range) = self.pitch_range {
            config.pitch_range = pitch_range;
        }
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.play {
            config.play = true;
        }
        if let Some(soundbank) = self.soundbank {
            config.soundbank = soundbank;
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub source: &'static str,
    pub tracks: usize,
    pub notes_per_track: usize,
    pub seed: u32,
    /// BLAKE3 hash of the written file
    pub hash: String,
    pub played: bool,
}

#[derive(Serialize)]
struct GenerateOutput {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<GenerateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

/// Run the generate command
///
/// # Arguments
/// * `config_path` - Optional JSON config file
/// * `overrides` - Flags given on the command line
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success
pub fn run(
    config_path: Option<&Path>,
    overrides: GenerateOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        return match generate(config_path, overrides) {
            Ok(report) => {
                print_json(&GenerateOutput {
                    success: true,
                    result: Some(report),
                    error: None,
                })?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                print_json(&GenerateOutput {
                    success: false,
                    result: None,
                    error: Some(JsonError::from_anyhow(&err)),
                })?;
                Ok(ExitCode::from(exit_status(&err)))
            }
        };
    }

    let report = generate(config_path, overrides)?;
    println!("{} {}", "Wrote:".green().bold(), report.output.display());
    println!(
        "{} {} track(s) x {} notes, {} source",
        "Pattern:".dimmed(),
        report.tracks,
        report.notes_per_track,
        report.source
    );
    println!("{} {}", "Seed:".dimmed(), report.seed);
    println!("{} {}", "BLAKE3:".dimmed(), report.hash);
    if report.played {
        println!("{} playback finished", "Played:".dimmed());
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves the config, builds the song and hashes the written file.
pub fn generate(config_path: Option<&Path>, overrides: GenerateOverrides) -> Result<GenerateReport> {
    let mut config = match config_path {
        Some(path) => SongConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SongConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let seed = config.seed.unwrap_or_else(rand::random::<u32>);
    tracing::info!(seed, explicit = config.seed.is_some(), "resolved seed");

    let source = SourceKind::load(&config.source).context("Failed to load data source")?;
    generate_song(
        &config,
        &source,
        seed,
        &MidiSerializer,
        &FluidSynthPlayer::default(),
    )
    .with_context(|| format!("Failed to generate {}", config.output.display()))?;

    let bytes = std::fs::read(&config.output)
        .with_context(|| format!("Failed to read back {}", config.output.display()))?;

    Ok(GenerateReport {
        output: config.output,
        source: source.label(),
        tracks: config.number_of_tracks,
        notes_per_track: config.notes_limit,
        seed,
        hash: blake3::hash(&bytes).to_hex().to_string(),
        played: config.play,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
