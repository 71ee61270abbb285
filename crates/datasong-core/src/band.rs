//! Pitch band allocation across tracks.
//!
//! The global pitch range is split into one contiguous sub-band per track so
//! tracks built from the same source occupy disjoint registers.

use serde::Serialize;

use crate::error::{SongError, SongResult};

/// The floor and width a track's integer pitches are scaled into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchBand {
    /// Inclusive floor. Real-valued because bands past the first start at a
    /// fractional offset when the range does not divide evenly.
    pub min_pitch: f64,
    /// Band width.
    pub range: f64,
}

impl PitchBand {
    pub fn new(min_pitch: f64, range: f64) -> Self {
        Self { min_pitch, range }
    }

    /// Upper edge of the band (`min_pitch + range`).
    pub fn max_pitch(&self) -> f64 {
        self.min_pitch + self.range
    }
}

/// Splits `[min_pitch, min_pitch + pitch_range]` into `number_of_tracks` bands.
///
/// Every band but the last is `pitch_range / number_of_tracks` wide and starts
/// where the previous one ends. The last band gets `pitch_range` minus the
/// in-order sum of the others, so summing the band ranges gives back
/// `pitch_range` exactly.
///
/// # Errors
/// Returns [`SongError::InvalidTrackCount`] when `number_of_tracks` is zero.
///
/// # Examples
/// ```
/// use datasong_core::band::{allocate_bands, PitchBand};
///
/// let bands = allocate_bands(3, 50, 30.0).unwrap();
/// assert_eq!(
///     bands,
///     vec![
///         PitchBand::new(50.0, 10.0),
///         PitchBand::new(60.0, 10.0),
///         PitchBand::new(70.0, 10.0),
///     ]
/// );
/// ```
pub fn allocate_bands(
    number_of_tracks: usize,
    min_pitch: i32,
    pitch_range: f64,
) -> SongResult<Vec<PitchBand>> {
    if number_of_tracks < 1 {
        return Err(SongError::InvalidTrackCount(number_of_tracks));
    }

    let track_range = pitch_range / number_of_tracks as f64;
    let mut bands = Vec::with_capacity(number_of_tracks);
    let mut floor = min_pitch as f64;
    let mut allocated = 0.0;
    for _ in 1..number_of_tracks {
        let band = PitchBand::new(floor, track_range);
        floor = band.max_pitch();
        allocated += track_range;
        bands.push(band);
    }

    // allocated >= pitch_range / 2 once a band exists, so this subtraction is exact
    bands.push(PitchBand::new(floor, pitch_range - allocated));

    tracing::debug!(number_of_tracks, min_pitch, pitch_range, "allocated pitch bands");
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_track_takes_whole_range() {
        let bands = allocate_bands(1, 50, 30.0).unwrap();
        assert_eq!(bands, vec![PitchBand::new(50.0, 30.0)]);
    }

    #[test]
    fn test_three_tracks_even_split() {
        let bands = allocate_bands(3, 50, 30.0).unwrap();
        assert_eq!(
            bands,
            vec![
                PitchBand::new(50.0, 10.0),
                PitchBand::new(60.0, 10.0),
                PitchBand::new(70.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_uneven_split_last_band_absorbs_remainder() {
        let bands = allocate_bands(4, 40, 10.0).unwrap();
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0], PitchBand::new(40.0, 2.5));
        assert_eq!(bands[3].min_pitch, 47.5);
        assert_eq!(bands[3].max_pitch(), 50.0);

        let total: f64 = bands.iter().map(|b| b.range).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn test_ranges_sum_exactly_for_inexact_split() {
        // 1/7 is not representable, and 6 * (1/7) rounds differently from 1/7 summed six times
        let bands = allocate_bands(7, 0, 1.0).unwrap();
        let total: f64 = bands.iter().map(|b| b.range).sum();
        assert_eq!(total, 1.0);

        let bands = allocate_bands(7, 50, 0.1).unwrap();
        let total: f64 = bands.iter().map(|b| b.range).sum();
        assert_eq!(total, 0.1);
    }

    #[test]
    fn test_bands_are_contiguous() {
        let bands = allocate_bands(7, 50, 1.0).unwrap();
        for pair in bands.windows(2) {
            assert_eq!(pair[0].max_pitch(), pair[1].min_pitch);
        }
    }

    #[test]
    fn test_zero_range() {
        let bands = allocate_bands(2, 60, 0.0).unwrap();
        assert!(bands.iter().all(|b| b.min_pitch == 60.0 && b.range == 0.0));
    }

    #[test]
    fn test_zero_tracks_rejected() {
        let err = allocate_bands(0, 50, 30.0).unwrap_err();
        assert!(matches!(err, SongError::InvalidTrackCount(0)));
        assert!(err.is_config_error());
    }
}
