//! Error types for pattern generation, serialization and playback.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for datasong operations.
pub type SongResult<T> = Result<T, SongError>;

/// Errors that can occur while building, writing or playing a pattern.
#[derive(Debug, Error)]
pub enum SongError {
    /// Track count below one.
    #[error("number of tracks must be an integer bigger than 0, got {0}")]
    InvalidTrackCount(usize),

    /// Note count of zero.
    #[error("notes limit must be bigger than 0")]
    InvalidNotesLimit,

    /// Negative, NaN or infinite pitch range.
    #[error("pitch range must be a finite non-negative number, got {0}")]
    InvalidPitchRange(f64),

    /// Function source name with no built-in implementation.
    #[error("unknown source function '{0}' (expected one of: sine)")]
    UnknownFunction(String),

    /// Failed to read a config file.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a config file.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read a source file.
    #[error("failed to read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode an image source.
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Text source produced no digits.
    #[error("text source is empty")]
    EmptyText,

    /// Source holds fewer values than notes requested.
    #[error("{kind} source has {available} values, too few for {notes_limit} notes")]
    SourceTooShort {
        kind: &'static str,
        available: usize,
        notes_limit: usize,
    },

    /// The source function failed or returned a non-finite value.
    #[error("source evaluation failed for function '{function}' at x = {x}: {message}")]
    SourceEvaluation {
        function: String,
        x: f64,
        message: String,
    },

    /// Function-mode volume bounds are inverted.
    #[error("empty volume range [{min}, {max}] for track floor {min_pitch}")]
    EmptyVolumeRange { min: i32, max: i32, min_pitch: f64 },

    /// A random-mode band holds no integer pitch.
    #[error("pitch band [{min_pitch}, {max_pitch}] contains no integer pitch")]
    EmptyPitchBand { min_pitch: f64, max_pitch: f64 },

    /// Pitch cannot be represented as a MIDI key.
    #[error("track {track} has pitch {pitch} outside the MIDI range 0..=127")]
    PitchOutOfRange { track: usize, pitch: i32 },

    /// Volume cannot be represented as a MIDI velocity.
    #[error("track {track} has volume {volume} outside the MIDI range 0..=127")]
    VolumeOutOfRange { track: usize, volume: i32 },

    /// Failed to encode the pattern as SMF bytes.
    #[error("failed to encode MIDI data: {0}")]
    MidiEncode(#[source] std::io::Error),

    /// Failed to write the MIDI file.
    #[error("failed to write MIDI file {path}: {source}")]
    MidiWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Soundbank file does not exist.
    #[error("soundbank not found: {0}")]
    SoundbankNotFound(PathBuf),

    /// No fluidsynth executable could be located.
    #[error("fluidsynth executable not found. Install fluidsynth and put it in PATH, or set FLUIDSYNTH_PATH")]
    PlayerNotFound,

    /// Failed to spawn the player process.
    #[error("failed to spawn player process: {0}")]
    PlayerSpawn(#[source] std::io::Error),

    /// Player process exited with non-zero status.
    #[error("player process exited with status {0}")]
    PlayerFailed(i32),
}

impl SongError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            SongError::InvalidTrackCount(_) => "SONG_001",
            SongError::InvalidNotesLimit => "SONG_002",
            SongError::InvalidPitchRange(_) => "SONG_003",
            SongError::UnknownFunction(_) => "SONG_004",
            SongError::ConfigRead { .. } => "SONG_005",
            SongError::ConfigParse { .. } => "SONG_006",
            SongError::SourceRead { .. } => "SONG_010",
            SongError::ImageDecode { .. } => "SONG_011",
            SongError::EmptyText => "SONG_012",
            SongError::SourceTooShort { .. } => "SONG_013",
            SongError::SourceEvaluation { .. } => "SONG_014",
            SongError::EmptyVolumeRange { .. } => "SONG_020",
            SongError::EmptyPitchBand { .. } => "SONG_021",
            SongError::PitchOutOfRange { .. } => "SONG_030",
            SongError::VolumeOutOfRange { .. } => "SONG_031",
            SongError::MidiEncode(_) => "SONG_032",
            SongError::MidiWrite { .. } => "SONG_033",
            SongError::SoundbankNotFound(_) => "SONG_040",
            SongError::PlayerNotFound => "SONG_041",
            SongError::PlayerSpawn(_) => "SONG_042",
            SongError::PlayerFailed(_) => "SONG_043",
        }
    }

    /// Whether this error was caused by the run configuration rather than the data.
    ///
    /// Configuration errors are detected before any source is read or any file is
    /// written.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SongError::InvalidTrackCount(_)
                | SongError::InvalidNotesLimit
                | SongError::InvalidPitchRange(_)
                | SongError::UnknownFunction(_)
                | SongError::ConfigRead { .. }
                | SongError::ConfigParse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_flagged() {
        assert!(SongError::InvalidTrackCount(0).is_config_error());
        assert!(SongError::InvalidNotesLimit.is_config_error());
        assert!(SongError::UnknownFunction("saw".into()).is_config_error());
        assert!(!SongError::EmptyText.is_config_error());
        assert!(!SongError::PlayerNotFound.is_config_error());
    }

    #[test]
    fn test_track_count_message() {
        let err = SongError::InvalidTrackCount(0);
        assert_eq!(err.code(), "SONG_001");
        assert!(err.to_string().contains("bigger than 0"));
    }
}
