//! Pitch mapping: normalized source values scaled into a track's band.
//!
//! Each mode produces exactly `notes_limit` values in `[0, 1]`, which
//! [`scale_pitch`] turns into integer pitches with
//! `floor(min_pitch + p * range)`. Random mode skips normalization and draws
//! integers from the band directly.
//!
//! Partition policies when the source length is not a multiple of the note count:
//!
//! - image mode drops the trailing `L mod notes_limit` pixels
//! - text mode gives the remainder to the last chunk, which is normalized by its
//!   own length

use std::f64::consts::PI;

use rand::Rng;

use crate::band::PitchBand;
use crate::error::{SongError, SongResult};
use crate::source::{DigitString, Pixel, SourceFunction, SourceKind};

/// Leading digits of a text chunk that contribute to its value. 10^19 still fits
/// a `u64` and is exactly representable as `f64`.
const MAX_FRACTION_DIGITS: usize = 19;

/// Scales a normalized pitch into `band`. No clamping is applied.
///
/// # Examples
/// ```
/// use datasong_core::band::PitchBand;
/// use datasong_core::mapper::scale_pitch;
///
/// let band = PitchBand::new(50.0, 30.0);
/// assert_eq!(scale_pitch(&band, 0.0), 50);
/// assert_eq!(scale_pitch(&band, 0.5), 65);
/// assert_eq!(scale_pitch(&band, 1.0), 80);
/// ```
pub fn scale_pitch(band: &PitchBand, normalized: f64) -> i32 {
    (band.min_pitch + normalized * band.range).floor() as i32
}

/// Samples `f` at `π·i / (min_pitch/5)` for `i` in `0..notes_limit`.
pub fn function_pitches(
    f: &SourceFunction,
    notes_limit: usize,
    min_pitch: f64,
) -> SongResult<Vec<f64>> {
    if min_pitch == 0.0 {
        return Err(SongError::SourceEvaluation {
            function: f.name().to_string(),
            x: f64::NAN,
            message: "sampling step is undefined for a track floor of 0".to_string(),
        });
    }
    let step = min_pitch / 5.0;
    (0..notes_limit)
        .map(|i| f.sample(PI * i as f64 / step))
        .collect()
}

/// Averages channel intensity over `notes_limit` equal pixel chunks.
///
/// Chunks hold `floor(L / notes_limit)` pixels each; leftover pixels at the end
/// of the buffer are ignored.
pub fn image_pitches(pixels: &[Pixel], notes_limit: usize) -> SongResult<Vec<f64>> {
    let per_note = per_note(pixels.len(), notes_limit);
    if per_note == 0 {
        return Err(SongError::SourceTooShort {
            kind: "image",
            available: pixels.len(),
            notes_limit,
        });
    }

    let denominator = (per_note * 255 * 3) as f64;
    let values = pixels
        .chunks_exact(per_note)
        .take(notes_limit)
        .map(|chunk| {
            let numerator: u64 = chunk
                .iter()
                .map(|[r, g, b]| *r as u64 + *g as u64 + *b as u64)
                .sum();
            numerator as f64 / denominator
        })
        .collect();
    Ok(values)
}

/// Splits `digits` into `notes_limit - 1` chunks of `floor(n / notes_limit)`
/// digits plus one final chunk holding everything that remains.
///
/// The chunks always concatenate back to `digits`.
///
/// # Examples
/// ```
/// use datasong_core::mapper::text_chunks;
/// use datasong_core::source::DigitString;
///
/// let digits = DigitString::from_digits("1234567").unwrap();
/// assert_eq!(text_chunks(&digits, 3).unwrap(), vec!["12", "34", "567"]);
/// ```
pub fn text_chunks(digits: &DigitString, notes_limit: usize) -> SongResult<Vec<&str>> {
    let digits = digits.as_str();
    let n = digits.len();
    if n == 0 {
        return Err(SongError::EmptyText);
    }
    if notes_limit == 0 {
        return Err(SongError::InvalidNotesLimit);
    }
    let per_note = per_note(n, notes_limit);
    if notes_limit > 1 && per_note == 0 {
        return Err(SongError::SourceTooShort {
            kind: "text",
            available: n,
            notes_limit,
        });
    }

    // ASCII only, so every byte offset is a char boundary
    let split = per_note * (notes_limit - 1);
    let mut chunks: Vec<&str> = (0..notes_limit - 1)
        .map(|i| &digits[i * per_note..(i + 1) * per_note])
        .collect();
    chunks.push(&digits[split..]);
    Ok(chunks)
}

/// Value of a digit chunk as the decimal fraction `0.d1d2d3…`, i.e. the chunk
/// read as an integer divided by `10^len`. An empty chunk is 0.
fn digit_fraction(chunk: &str) -> f64 {
    let take = chunk.len().min(MAX_FRACTION_DIGITS);
    if take == 0 {
        return 0.0;
    }
    let numerator = chunk.as_bytes()[..take]
        .iter()
        .fold(0u64, |acc, d| acc * 10 + (d - b'0') as u64);
    numerator as f64 / 10f64.powi(take as i32)
}

/// Normalized pitches for a digit string.
pub fn text_pitches(digits: &DigitString, notes_limit: usize) -> SongResult<Vec<f64>> {
    Ok(text_chunks(digits, notes_limit)?
        .into_iter()
        .map(digit_fraction)
        .collect())
}

/// Draws `notes_limit` integer pitches uniformly from
/// `[ceil(min_pitch), floor(min_pitch + range)]`.
pub fn random_pitches<R: Rng>(
    band: &PitchBand,
    notes_limit: usize,
    rng: &mut R,
) -> SongResult<Vec<i32>> {
    let low = band.min_pitch.ceil();
    let high = band.max_pitch().floor();
    if high < low {
        return Err(SongError::EmptyPitchBand {
            min_pitch: band.min_pitch,
            max_pitch: band.max_pitch(),
        });
    }
    let (low, high) = (low as i32, high as i32);
    Ok((0..notes_limit).map(|_| rng.gen_range(low..=high)).collect())
}

/// Produces the `notes_limit` integer pitches of one track.
pub fn map_pitches<R: Rng>(
    source: &SourceKind,
    notes_limit: usize,
    band: &PitchBand,
    rng: &mut R,
) -> SongResult<Vec<i32>> {
    let normalized = match source {
        SourceKind::Function(f) => function_pitches(f, notes_limit, band.min_pitch)?,
        SourceKind::ImageBuffer(buffer) => image_pitches(buffer.pixels(), notes_limit)?,
        SourceKind::DigitString(digits) => text_pitches(digits, notes_limit)?,
        SourceKind::Random => return random_pitches(band, notes_limit, rng),
    };
    Ok(normalized.iter().map(|p| scale_pitch(band, *p)).collect())
}

fn per_note(len: usize, notes_limit: usize) -> usize {
    if notes_limit == 0 {
        0
    } else {
        len / notes_limit
    }
}
