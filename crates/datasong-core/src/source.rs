//! Source adapters.
//!
//! Every supported input is normalized into one [`SourceKind`] variant, chosen
//! once per run, which the pitch mapper then samples:
//!
//! - [`SourceFunction`]: a real-to-real callable
//! - [`PixelBuffer`]: decoded image pixels flattened to `(r, g, b)` triples
//! - [`DigitString`]: a text file's bytes read as one big-endian integer,
//!   rendered in decimal

use std::fmt;
use std::path::Path;

use crate::config::SourceConfig;
use crate::error::{SongError, SongResult};

/// Signature of a source function. `Err` carries the failure message.
pub type SampleFn = dyn Fn(f64) -> Result<f64, String>;

/// The built-in normalized sinusoid, `(sin(x) + 1) / 2`, always in `[0, 1]`.
pub fn sinusoidal(x: f64) -> f64 {
    (x.sin() + 1.0) / 2.0
}

/// A named real-to-real callable sampled once per note.
pub struct SourceFunction {
    name: String,
    f: Box<SampleFn>,
}

impl SourceFunction {
    /// Wraps a fallible callable under a display name.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(f64) -> Result<f64, String> + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }

    /// The built-in `sine` function.
    pub fn sine() -> Self {
        Self::new("sine", |x| Ok(sinusoidal(x)))
    }

    /// Looks up a built-in function by name.
    pub fn builtin(name: &str) -> SongResult<Self> {
        match name {
            "sine" => Ok(Self::sine()),
            other => Err(SongError::UnknownFunction(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the function at `x`.
    ///
    /// # Errors
    /// Returns [`SongError::SourceEvaluation`] when the callable fails or returns
    /// NaN or infinity.
    pub fn sample(&self, x: f64) -> SongResult<f64> {
        let value = (self.f)(x).map_err(|message| SongError::SourceEvaluation {
            function: self.name.clone(),
            x,
            message,
        })?;
        if !value.is_finite() {
            return Err(SongError::SourceEvaluation {
                function: self.name.clone(),
                x,
                message: format!("non-finite result {}", value),
            });
        }
        Ok(value)
    }
}

impl fmt::Debug for SourceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One pixel as 8-bit `[r, g, b]`.
pub type Pixel = [u8; 3];

/// Decoded image pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    pub fn new(pixels: Vec<Pixel>) -> Self {
        Self { pixels }
    }

    /// Builds a buffer from interleaved RGB bytes. A trailing partial pixel is
    /// ignored.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Self {
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self { pixels }
    }

    /// Decodes an image file and flattens it to `width * height` RGB triples.
    ///
    /// Alpha is discarded and grayscale is expanded to three equal channels.
    pub fn load(path: &Path) -> SongResult<Self> {
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => SongError::SourceRead {
                path: path.to_path_buf(),
                source,
            },
            source => SongError::ImageDecode {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let rgb = img.to_rgb8();
        tracing::debug!(
            width = rgb.width(),
            height = rgb.height(),
            path = %path.display(),
            "decoded image source"
        );
        Ok(Self::from_rgb_bytes(rgb.as_raw()))
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// A decimal digit string derived from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitString(String);

impl DigitString {
    /// Reads `bytes` as one big-endian unsigned integer and renders it in decimal.
    ///
    /// Empty input yields an empty string; leading zero bytes do not contribute
    /// digits, and all-zero input renders as `"0"`.
    ///
    /// # Examples
    /// ```
    /// use datasong_core::source::DigitString;
    ///
    /// assert_eq!(DigitString::from_bytes(b"A").as_str(), "65");
    /// assert_eq!(DigitString::from_bytes(&[0x01, 0x00]).as_str(), "256");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes_to_decimal(bytes))
    }

    /// Digit string of a text's UTF-8 bytes after newline normalization.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(normalize_newlines(text).as_bytes())
    }

    /// Wraps an existing string of ASCII digits.
    ///
    /// Returns `None` if `digits` contains anything but `0-9`.
    pub fn from_digits(digits: impl Into<String>) -> Option<Self> {
        let digits = digits.into();
        digits
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then_some(Self(digits))
    }

    /// Reads a UTF-8 text file and converts it.
    ///
    /// # Errors
    /// [`SongError::SourceRead`] if the file is missing, unreadable or not UTF-8;
    /// [`SongError::EmptyText`] if it has no content.
    pub fn load(path: &Path) -> SongResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SongError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        let digits = Self::from_text(&text);
        if digits.is_empty() {
            return Err(SongError::EmptyText);
        }
        tracing::debug!(
            bytes = text.len(),
            digits = digits.len(),
            path = %path.display(),
            "converted text source"
        );
        Ok(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Text-mode newline handling: `\r\n` and lone `\r` both become `\n`.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

const LIMB_BASE: u64 = 1_000_000_000;

/// Base-256 to base-10 conversion over base-10^9 limbs, least significant first.
fn bytes_to_decimal(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let mut limbs: Vec<u32> = Vec::with_capacity(bytes.len() / 4 + 1);
    for &byte in bytes {
        let mut carry = byte as u64;
        for limb in limbs.iter_mut() {
            let value = (*limb as u64) * 256 + carry;
            *limb = (value % LIMB_BASE) as u32;
            carry = value / LIMB_BASE;
        }
        while carry > 0 {
            limbs.push((carry % LIMB_BASE) as u32);
            carry /= LIMB_BASE;
        }
    }

    let Some((most_significant, rest)) = limbs.split_last() else {
        return "0".to_string();
    };

    let mut out = String::with_capacity(limbs.len() * 9);
    out.push_str(&most_significant.to_string());
    for limb in rest.iter().rev() {
        out.push_str(&format!("{:09}", limb));
    }
    out
}

/// The data a pattern is built from, selected once per run.
#[derive(Debug)]
pub enum SourceKind {
    /// Sampled at `π·i / (min_pitch/5)` for note `i`.
    Function(SourceFunction),
    /// Averaged over equal pixel chunks.
    ImageBuffer(PixelBuffer),
    /// Split into decimal chunks.
    DigitString(DigitString),
    /// No source; pitches are drawn at random.
    Random,
}

impl SourceKind {
    /// Shorthand for the built-in sinusoid.
    pub fn sine() -> Self {
        SourceKind::Function(SourceFunction::sine())
    }

    /// Loads the source a config asks for, reading files where needed.
    pub fn load(config: &SourceConfig) -> SongResult<Self> {
        match config {
            SourceConfig::Function { name } => {
                Ok(SourceKind::Function(SourceFunction::builtin(name)?))
            }
            SourceConfig::Image { path } => Ok(SourceKind::ImageBuffer(PixelBuffer::load(path)?)),
            SourceConfig::Text { path } => Ok(SourceKind::DigitString(DigitString::load(path)?)),
            SourceConfig::Random => Ok(SourceKind::Random),
        }
    }

    /// Short mode name for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Function(_) => "function",
            SourceKind::ImageBuffer(_) => "image",
            SourceKind::DigitString(_) => "text",
            SourceKind::Random => "random",
        }
    }
}
