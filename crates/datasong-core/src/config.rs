//! Run configuration.
//!
//! A [`SongConfig`] holds every top-level parameter of a run. It can be loaded
//! from JSON, where omitted fields take the defaults below:
//!
//! ```json
//! {
//!   "output": "sin.mid",
//!   "notes_limit": 70,
//!   "number_of_tracks": 1,
//!   "min_pitch": 50,
//!   "pitch_range": 30.0,
//!   "source": { "kind": "function", "name": "sine" },
//!   "seed": null,
//!   "play": false,
//!   "soundbank": "FluidR3_GM.sf2"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SongError, SongResult};
use crate::generate::PatternParams;
use crate::source::SourceFunction;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "sin.mid";

/// Default soundbank handed to the player.
pub const DEFAULT_SOUNDBANK: &str = "FluidR3_GM.sf2";

/// Default number of notes per track.
pub const DEFAULT_NOTES_LIMIT: usize = 70;

/// Default number of tracks.
pub const DEFAULT_NUMBER_OF_TRACKS: usize = 1;

/// Default lowest pitch.
pub const DEFAULT_MIN_PITCH: i32 = 50;

/// Default pitch range.
pub const DEFAULT_PITCH_RANGE: f64 = 30.0;

/// Which data source a run reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SourceConfig {
    /// A built-in function, by name.
    Function { name: String },
    /// An image file.
    Image { path: PathBuf },
    /// A UTF-8 text file.
    Text { path: PathBuf },
    /// No source; random pitches.
    Random,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Function {
            name: "sine".to_string(),
        }
    }
}

/// Top-level parameters of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SongConfig {
    /// MIDI file to write.
    pub output: PathBuf,
    /// Notes per track.
    pub notes_limit: usize,
    /// Number of parallel tracks.
    pub number_of_tracks: usize,
    /// Floor of the global pitch range.
    pub min_pitch: i32,
    /// Width of the global pitch range.
    pub pitch_range: f64,
    /// Data source.
    pub source: SourceConfig,
    /// Run seed; drawn at random when absent.
    pub seed: Option<u32>,
    /// Whether to play the file after writing it.
    pub play: bool,
    /// Soundbank for playback.
    pub soundbank: PathBuf,
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            notes_limit: DEFAULT_NOTES_LIMIT,
            number_of_tracks: DEFAULT_NUMBER_OF_TRACKS,
            min_pitch: DEFAULT_MIN_PITCH,
            pitch_range: DEFAULT_PITCH_RANGE,
            source: SourceConfig::default(),
            seed: None,
            play: false,
            soundbank: PathBuf::from(DEFAULT_SOUNDBANK),
        }
    }
}

impl SongConfig {
    /// Parses a config from a JSON string. `origin` names the source in errors.
    pub fn from_json_str(json: &str, origin: &Path) -> SongResult<Self> {
        serde_json::from_str(json).map_err(|source| SongError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: &Path) -> SongResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SongError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, path)
    }

    /// The pattern-shaping subset of the config.
    pub fn pattern_params(&self) -> PatternParams {
        PatternParams {
            notes_limit: self.notes_limit,
            number_of_tracks: self.number_of_tracks,
            min_pitch: self.min_pitch,
            pitch_range: self.pitch_range,
        }
    }

    /// Checks everything that can be checked without reading the source.
    pub fn validate(&self) -> SongResult<()> {
        self.pattern_params().validate()?;
        if let SourceConfig::Function { name } = &self.source {
            SourceFunction::builtin(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = SongConfig::from_json_str("{}", Path::new("test.json")).unwrap();
        assert_eq!(config, SongConfig::default());
        assert_eq!(config.output, PathBuf::from("sin.mid"));
        assert_eq!(config.notes_limit, 70);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_text_source() {
        let json = r#"{
            "output": "poem.mid",
            "number_of_tracks": 3,
            "source": { "kind": "text", "path": "poem.txt" },
            "seed": 7
        }"#;
        let config = SongConfig::from_json_str(json, Path::new("test.json")).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Text {
                path: PathBuf::from("poem.txt")
            }
        );
        assert_eq!(config.number_of_tracks, 3);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_parse_random_source() {
        let json = r#"{ "source": { "kind": "random" } }"#;
        let config = SongConfig::from_json_str(json, Path::new("test.json")).unwrap();
        assert_eq!(config.source, SourceConfig::Random);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SongConfig::from_json_str(r#"{ "tempo": 120 }"#, Path::new("test.json"))
            .unwrap_err();
        assert!(matches!(err, SongError::ConfigParse { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_negative_track_count_rejected_at_parse() {
        let err = SongConfig::from_json_str(r#"{ "number_of_tracks": -1 }"#, Path::new("t.json"))
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SongConfig {
            number_of_tracks: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SongError::InvalidTrackCount(0))));

        let config = SongConfig {
            notes_limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SongError::InvalidNotesLimit)));

        let config = SongConfig {
            pitch_range: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SongError::InvalidPitchRange(_))));

        let config = SongConfig {
            source: SourceConfig::Function {
                name: "square".into(),
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SongError::UnknownFunction(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let err = SongConfig::load(Path::new("/nonexistent/datasong.json")).unwrap_err();
        assert!(matches!(err, SongError::ConfigRead { .. }));
    }
}
