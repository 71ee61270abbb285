//! The full composition: tracks in insertion order.

use crate::track::Track;

/// An ordered collection of tracks. Track order is significant and is preserved
/// through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    tracks: Vec<Track>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track after all existing ones.
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of notes across all tracks.
    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(Track::note_count).sum()
    }
}
