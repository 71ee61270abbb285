//! MIDI output for patterns.
//!
//! Converts a [`Pattern`] into a Standard MIDI File, format 1, one SMF track per
//! pattern track in pattern order. Every track plays on channel 0. Track event
//! ticks are already relative, so they become SMF deltas unchanged.
//!
//! Uses the `midly` crate for MIDI writing.

use std::path::Path;

use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{SongError, SongResult};
use crate::pattern::Pattern;
use crate::track::TrackEvent;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 220;

/// MIDI channel every note is sent on.
pub const MIDI_CHANNEL: u8 = 0;

/// Writes a pattern to a file.
///
/// This is the only contract the generator has with the output format, so tests
/// can substitute a recorder.
pub trait Serializer {
    fn write(&self, pattern: &Pattern, path: &Path) -> SongResult<()>;
}

/// [`Serializer`] producing Standard MIDI Files.
#[derive(Debug, Default, Clone, Copy)]
pub struct MidiSerializer;

impl MidiSerializer {
    /// Converts a pattern to an in-memory SMF.
    ///
    /// # Errors
    /// [`SongError::PitchOutOfRange`] or [`SongError::VolumeOutOfRange`] when a
    /// note does not fit in 7 bits. Values are never clamped.
    pub fn to_smf(pattern: &Pattern) -> SongResult<Smf<'static>> {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));
        let channel = u4::new(MIDI_CHANNEL);

        for (index, track) in pattern.tracks().iter().enumerate() {
            let mut events: midly::Track<'static> = Vec::with_capacity(track.events().len());
            for event in track.events() {
                let (tick, kind) = match *event {
                    TrackEvent::NoteOn {
                        tick,
                        pitch,
                        volume,
                    } => (
                        tick,
                        TrackEventKind::Midi {
                            channel,
                            message: MidiMessage::NoteOn {
                                key: midi_key(index, pitch)?,
                                vel: midi_velocity(index, volume)?,
                            },
                        },
                    ),
                    TrackEvent::NoteOff {
                        tick,
                        pitch,
                        volume,
                    } => (
                        tick,
                        TrackEventKind::Midi {
                            channel,
                            message: MidiMessage::NoteOff {
                                key: midi_key(index, pitch)?,
                                vel: midi_velocity(index, volume)?,
                            },
                        },
                    ),
                    TrackEvent::EndOfTrack { tick } => {
                        (tick, TrackEventKind::Meta(MetaMessage::EndOfTrack))
                    }
                };
                events.push(midly::TrackEvent {
                    delta: u28::new(tick),
                    kind,
                });
            }
            smf.tracks.push(events);
        }

        Ok(smf)
    }

    /// Encodes a pattern as SMF bytes.
    pub fn to_bytes(pattern: &Pattern) -> SongResult<Vec<u8>> {
        let smf = Self::to_smf(pattern)?;
        let mut buf = Vec::new();
        smf.write_std(&mut buf).map_err(SongError::MidiEncode)?;
        Ok(buf)
    }
}

impl Serializer for MidiSerializer {
    fn write(&self, pattern: &Pattern, path: &Path) -> SongResult<()> {
        let bytes = Self::to_bytes(pattern)?;
        std::fs::write(path, &bytes).map_err(|source| SongError::MidiWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            tracks = pattern.len(),
            bytes = bytes.len(),
            "wrote MIDI file"
        );
        Ok(())
    }
}

fn midi_key(track: usize, pitch: i32) -> SongResult<u7> {
    seven_bit(pitch).ok_or(SongError::PitchOutOfRange { track, pitch })
}

fn midi_velocity(track: usize, volume: i32) -> SongResult<u7> {
    seven_bit(volume).ok_or(SongError::VolumeOutOfRange { track, volume })
}

fn seven_bit(value: i32) -> Option<u7> {
    (0..=127).contains(&value).then(|| u7::new(value as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use crate::track::{build_track, VolumePolicy};

    fn pattern_of(pitches: &[&[i32]]) -> Pattern {
        let mut pattern = Pattern::new();
        for p in pitches {
            pattern.push(build_track(p, VolumePolicy::Fixed(70), &mut create_rng(0)));
        }
        pattern
    }

    #[test]
    fn test_pattern_to_smf() {
        let pattern = pattern_of(&[&[60, 62], &[70]]);
        let smf = MidiSerializer::to_smf(&pattern).unwrap();

        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(220)));
        assert_eq!(smf.tracks.len(), 2);
        assert_eq!(smf.tracks[0].len(), 5);
        assert_eq!(smf.tracks[1].len(), 3);

        let off = smf.tracks[0][1];
        assert_eq!(off.delta, u28::new(140));
        assert_eq!(
            off.kind,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOff {
                    key: u7::new(60),
                    vel: u7::new(70),
                },
            }
        );
        assert_eq!(
            smf.tracks[1][2].kind,
            TrackEventKind::Meta(MetaMessage::EndOfTrack)
        );
    }

    #[test]
    fn test_bytes_parse_back() {
        let pattern = pattern_of(&[&[50, 80]]);
        let bytes = MidiSerializer::to_bytes(&pattern).unwrap();
        assert_eq!(&bytes[..4], b"MThd");

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(smf.tracks[0].len(), 5);
    }

    #[test]
    fn test_out_of_range_pitch_rejected() {
        let pattern = pattern_of(&[&[60], &[128]]);
        let err = MidiSerializer::to_smf(&pattern).unwrap_err();
        assert!(matches!(
            err,
            SongError::PitchOutOfRange {
                track: 1,
                pitch: 128
            }
        ));

        let pattern = pattern_of(&[&[-1]]);
        assert!(MidiSerializer::to_smf(&pattern).is_err());
    }

    #[test]
    fn test_out_of_range_volume_rejected() {
        let mut pattern = Pattern::new();
        pattern.push(build_track(&[60], VolumePolicy::Fixed(200), &mut create_rng(0)));
        assert!(matches!(
            MidiSerializer::to_smf(&pattern),
            Err(SongError::VolumeOutOfRange { volume: 200, .. })
        ));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        MidiSerializer.write(&pattern_of(&[&[64]]), &path).unwrap();
        assert!(path.exists());
    }
}
