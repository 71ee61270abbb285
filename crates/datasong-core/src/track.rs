//! Track building: integer pitches to note-on/note-off event pairs.

use rand::Rng;

use crate::band::PitchBand;
use crate::error::{SongError, SongResult};
use crate::source::SourceKind;

/// Relative tick of every note-on event.
pub const NOTE_ON_TICK: u32 = 0;

/// Relative tick of every note-off event (note length).
pub const NOTE_OFF_TICK: u32 = 140;

/// Relative tick of the end-of-track marker.
pub const END_OF_TRACK_TICK: u32 = 1;

/// Fixed volume for image and text tracks.
pub const DATA_VOLUME: i32 = 70;

/// Fixed volume for random tracks.
pub const RANDOM_VOLUME: i32 = 75;

/// Lower bound of function-mode volume jitter.
pub const FUNCTION_VOLUME_MIN: i32 = 55;

/// Function-mode upper bound before the `floor(min_pitch / 8)` lift.
pub const FUNCTION_VOLUME_BASE: i32 = 60;

/// One event in a track. Ticks are relative to the previous event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEvent {
    NoteOn { tick: u32, pitch: i32, volume: i32 },
    NoteOff { tick: u32, pitch: i32, volume: i32 },
    EndOfTrack { tick: u32 },
}

/// How note volumes are chosen for a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePolicy {
    /// Same volume for every note.
    Fixed(i32),
    /// Uniform random volume in `[min, max]` per note.
    Jitter { min: i32, max: i32 },
}

impl VolumePolicy {
    /// The policy each source mode uses for a track in `band`.
    ///
    /// Function tracks jitter in `[55, 60 + floor(min_pitch / 8)]`, so higher
    /// bands play slightly louder; image and text tracks use 70; random tracks 75.
    ///
    /// # Errors
    /// [`SongError::EmptyVolumeRange`] when a very low band floor pushes the
    /// function-mode upper bound below 55.
    pub fn for_source(source: &SourceKind, band: &PitchBand) -> SongResult<Self> {
        match source {
            SourceKind::Function(_) => {
                let max = FUNCTION_VOLUME_BASE + (band.min_pitch / 8.0).floor() as i32;
                if max < FUNCTION_VOLUME_MIN {
                    return Err(SongError::EmptyVolumeRange {
                        min: FUNCTION_VOLUME_MIN,
                        max,
                        min_pitch: band.min_pitch,
                    });
                }
                Ok(VolumePolicy::Jitter {
                    min: FUNCTION_VOLUME_MIN,
                    max,
                })
            }
            SourceKind::ImageBuffer(_) | SourceKind::DigitString(_) => {
                Ok(VolumePolicy::Fixed(DATA_VOLUME))
            }
            SourceKind::Random => Ok(VolumePolicy::Fixed(RANDOM_VOLUME)),
        }
    }

    fn next<R: Rng>(&self, rng: &mut R) -> i32 {
        match *self {
            VolumePolicy::Fixed(volume) => volume,
            VolumePolicy::Jitter { min, max } => rng.gen_range(min..=max),
        }
    }
}

/// An ordered list of note pairs closed by an end-of-track marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// `(pitch, volume)` of every note, in order.
    pub fn notes(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            TrackEvent::NoteOn { pitch, volume, .. } => Some((pitch, volume)),
            _ => None,
        })
    }

    pub fn pitches(&self) -> Vec<i32> {
        self.notes().map(|(pitch, _)| pitch).collect()
    }

    pub fn note_count(&self) -> usize {
        self.notes().count()
    }
}

/// Builds a track with one note-on/note-off pair per pitch.
///
/// # Examples
/// ```
/// use datasong_core::rng::create_rng;
/// use datasong_core::track::{build_track, TrackEvent, VolumePolicy};
///
/// let track = build_track(&[60, 64], VolumePolicy::Fixed(70), &mut create_rng(0));
/// assert_eq!(track.events().len(), 5);
/// assert_eq!(
///     track.events()[1],
///     TrackEvent::NoteOff { tick: 140, pitch: 60, volume: 70 }
/// );
/// ```
pub fn build_track<R: Rng>(pitches: &[i32], volume: VolumePolicy, rng: &mut R) -> Track {
    let mut events = Vec::with_capacity(pitches.len() * 2 + 1);
    for &pitch in pitches {
        let volume = volume.next(rng);
        events.push(TrackEvent::NoteOn {
            tick: NOTE_ON_TICK,
            pitch,
            volume,
        });
        events.push(TrackEvent::NoteOff {
            tick: NOTE_OFF_TICK,
            pitch,
            volume,
        });
    }
    events.push(TrackEvent::EndOfTrack {
        tick: END_OF_TRACK_TICK,
    });
    Track { events }
}
