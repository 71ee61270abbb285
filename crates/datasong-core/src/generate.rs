//! Main entry point for pattern generation.
//!
//! Ties the pieces together: bands are allocated up front, then each track maps
//! the shared source into its own band with its own RNG stream. Any failure
//! aborts the whole pattern, and nothing is serialized unless every track was
//! built.

use rand::Rng;

use crate::band::{allocate_bands, PitchBand};
use crate::config::SongConfig;
use crate::error::{SongError, SongResult};
use crate::mapper::map_pitches;
use crate::midi::Serializer;
use crate::pattern::Pattern;
use crate::playback::Player;
use crate::rng::create_track_rng;
use crate::source::SourceKind;
use crate::track::{build_track, Track, VolumePolicy};

/// Shape of a pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternParams {
    /// Notes per track.
    pub notes_limit: usize,
    /// Number of tracks, at least 1.
    pub number_of_tracks: usize,
    /// Floor of the global pitch range.
    pub min_pitch: i32,
    /// Width of the global pitch range.
    pub pitch_range: f64,
}

impl PatternParams {
    /// Rejects parameters no pattern can be built from.
    pub fn validate(&self) -> SongResult<()> {
        if self.number_of_tracks < 1 {
            return Err(SongError::InvalidTrackCount(self.number_of_tracks));
        }
        if self.notes_limit == 0 {
            return Err(SongError::InvalidNotesLimit);
        }
        if !self.pitch_range.is_finite() || self.pitch_range < 0.0 {
            return Err(SongError::InvalidPitchRange(self.pitch_range));
        }
        Ok(())
    }
}

/// Builds one track of `notes_limit` notes from `source` within `band`.
pub fn make_single_track<R: Rng>(
    source: &SourceKind,
    notes_limit: usize,
    band: &PitchBand,
    rng: &mut R,
) -> SongResult<Track> {
    let volume = VolumePolicy::for_source(source, band)?;
    let pitches = map_pitches(source, notes_limit, band, rng)?;
    Ok(build_track(&pitches, volume, rng))
}

/// Builds the full pattern, one track per band, in band order.
///
/// Track `i` draws from an RNG derived from `seed` and `i`, so the result is
/// fully determined by the source, the parameters and the seed.
///
/// # Errors
/// Configuration errors are reported before any track is built; source errors
/// abort the pattern at the first failing track.
pub fn make_pattern(
    source: &SourceKind,
    params: &PatternParams,
    seed: u32,
) -> SongResult<Pattern> {
    params.validate()?;
    let bands = allocate_bands(params.number_of_tracks, params.min_pitch, params.pitch_range)?;

    let mut pattern = Pattern::new();
    for (index, band) in bands.iter().enumerate() {
        let mut rng = create_track_rng(seed, index as u32);
        let track = make_single_track(source, params.notes_limit, band, &mut rng)?;
        tracing::debug!(
            track = index,
            min_pitch = band.min_pitch,
            range = band.range,
            mode = source.label(),
            "built track"
        );
        pattern.push(track);
    }
    Ok(pattern)
}

/// Builds the pattern for `config`, writes it, and plays it if requested.
///
/// The caller loads `source` from `config.source` and resolves the seed.
pub fn generate_song(
    config: &SongConfig,
    source: &SourceKind,
    seed: u32,
    serializer: &dyn Serializer,
    player: &dyn Player,
) -> SongResult<Pattern> {
    let pattern = make_pattern(source, &config.pattern_params(), seed)?;
    serializer.write(&pattern, &config.output)?;
    if config.play {
        player.play(&config.output, &config.soundbank)?;
    }
    Ok(pattern)
}
