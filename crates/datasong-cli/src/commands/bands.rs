//! Bands command implementation
//!
//! Prints how the global pitch range is split across tracks.

use anyhow::{Context, Result};
use colored::Colorize;
use datasong_core::{allocate_bands, PitchBand, SongError};
use std::process::ExitCode;

/// Computes the band allocation, rejecting ranges no pattern could use.
pub fn compute(number_of_tracks: usize, min_pitch: i32, pitch_range: f64) -> Result<Vec<PitchBand>> {
    if !pitch_range.is_finite() || pitch_range < 0.0 {
        return Err(SongError::InvalidPitchRange(pitch_range)).context("Invalid configuration");
    }
    allocate_bands(number_of_tracks, min_pitch, pitch_range).context("Invalid configuration")
}

/// Run the bands command
pub fn run(
    number_of_tracks: usize,
    min_pitch: i32,
    pitch_range: f64,
    json_output: bool,
) -> Result<ExitCode> {
    let bands = compute(number_of_tracks, min_pitch, pitch_range)?;

    if json_output {
        let json = serde_json::to_string_pretty(&bands).context("Failed to serialize bands")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} track(s) over [{}, {}]",
        "Bands:".cyan().bold(),
        bands.len(),
        min_pitch,
        min_pitch as f64 + pitch_range
    );
    for (index, band) in bands.iter().enumerate() {
        println!(
            "  {} {:>7.2} .. {:<7.2} {}",
            format!("track {}", index).dimmed(),
            band.min_pitch,
            band.max_pitch(),
            format!("(range {:.2})", band.range).dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{exit_status, EXIT_CONFIG_ERROR};

    #[test]
    fn test_compute_splits_evenly() {
        let bands = compute(3, 50, 30.0).unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[2], PitchBand::new(70.0, 10.0));
    }

    #[test]
    fn test_zero_tracks_is_config_error() {
        let err = compute(0, 50, 30.0).unwrap_err();
        assert_eq!(exit_status(&err), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_negative_range_is_config_error() {
        let err = compute(2, 50, -1.0).unwrap_err();
        assert_eq!(exit_status(&err), EXIT_CONFIG_ERROR);
    }
}
