//! datasong Core - Deterministic Data-to-MIDI Mapping
//!
//! This crate turns a data source into a multi-track note pattern. Three kinds of
//! data are supported, plus a purely random fallback:
//!
//! - **Function**: a real-to-real callable sampled once per note
//! - **Image buffer**: decoded pixels, averaged in equal chunks
//! - **Digit string**: the bytes of a text file read as one large decimal number
//! - **Random**: pitches drawn uniformly from each track's band
//!
//! # Pipeline
//!
//! ```text
//! band::allocate_bands -> mapper::map_pitches -> track::build_track -> Pattern
//!                                                                    -> Serializer
//!                                                                    -> Player
//! ```
//!
//! The global pitch range is split into one contiguous band per track, every track
//! maps the same source into its own band, and the finished [`Pattern`] is handed to
//! a [`Serializer`] (MIDI via `midly`) and optionally a [`Player`] (`fluidsynth`).
//!
//! # Determinism
//!
//! All randomness (function-mode volume jitter, random-mode pitches) flows through
//! [`rng`]. Each track gets its own PCG32 stream derived from the run seed with
//! BLAKE3, so the same seed always yields byte-identical MIDI output.
//!
//! # Example
//!
//! ```
//! use datasong_core::generate::{make_pattern, PatternParams};
//! use datasong_core::source::SourceKind;
//!
//! let params = PatternParams {
//!     notes_limit: 8,
//!     number_of_tracks: 2,
//!     min_pitch: 50,
//!     pitch_range: 30.0,
//! };
//! let pattern = make_pattern(&SourceKind::sine(), &params, 42).unwrap();
//! assert_eq!(pattern.len(), 2);
//! assert_eq!(pattern.tracks()[0].events().len(), 2 * 8 + 1);
//! ```

pub mod band;
pub mod config;
pub mod error;
pub mod generate;
pub mod mapper;
pub mod midi;
pub mod pattern;
pub mod playback;
pub mod rng;
pub mod source;
pub mod track;

pub use band::{allocate_bands, PitchBand};
pub use config::{SongConfig, SourceConfig};
pub use error::{SongError, SongResult};
pub use generate::{generate_song, make_pattern, make_single_track, PatternParams};
pub use midi::{MidiSerializer, Serializer};
pub use pattern::Pattern;
pub use playback::{FluidSynthPlayer, Player};
pub use source::{DigitString, PixelBuffer, SourceFunction, SourceKind};
pub use track::{Track, TrackEvent};

/// Crate version for output reports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
