//! License key generation and shape validation.
//!
//! Keys look like `XXXX-XXXX-XXXX-XXXX`: a number of segments, each a run
//! of characters from `A-Z0-9`, joined by `-`. Characters are drawn
//! independently and uniformly from a cryptographically secure source, so
//! keys are not predictable. Uniqueness is not checked here; that is the
//! job of a database constraint on `licenses.key`.

use std::fmt;

use rand::{CryptoRng, Rng, RngCore};
use thiserror::Error;

use crate::constants::{
    DEFAULT_SEGMENT_LENGTH, DEFAULT_SEGMENTS, KEY_ALPHABET, KEY_SEPARATOR, MAX_SHAPE_DIMENSION,
};

/// Errors from building a key shape or parsing a key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    #[error("malformed license key: {0}")]
    Malformed(String),
}

/// Number of segments and characters per segment of a key.
///
/// Both dimensions are in `1..=64`; the constructor is the only way to
/// build one, so a `KeyShape` in hand is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyShape {
    segments: usize,
    segment_length: usize,
}

impl KeyShape {
    pub fn new(segments: usize, segment_length: usize) -> Result<Self, KeyError> {
        check_dimension("segment count", segments)?;
        check_dimension("segment length", segment_length)?;
        Ok(Self {
            segments,
            segment_length,
        })
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    /// Total length of a key with this shape, separators included.
    pub fn key_len(&self) -> usize {
        self.segments * self.segment_length + (self.segments - 1)
    }
}

impl Default for KeyShape {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            segment_length: DEFAULT_SEGMENT_LENGTH,
        }
    }
}

impl fmt::Display for KeyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.segments, self.segment_length)
    }
}

fn check_dimension(name: &'static str, value: usize) -> Result<(), KeyError> {
    if value == 0 {
        return Err(KeyError::InvalidParameter {
            name,
            value,
            reason: "must be at least 1",
        });
    }
    if value > MAX_SHAPE_DIMENSION {
        return Err(KeyError::InvalidParameter {
            name,
            value,
            reason: "must be at most 64",
        });
    }
    Ok(())
}

/// A generated or parsed license key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Parse `text` as a key of the given shape.
    pub fn parse(text: &str, shape: KeyShape) -> Result<Self, KeyError> {
        let segments: Vec<&str> = text.split(KEY_SEPARATOR).collect();
        if segments.len() != shape.segments() {
            return Err(KeyError::Malformed(format!(
                "expected {} segments, found {}",
                shape.segments(),
                segments.len()
            )));
        }

        for (i, segment) in segments.iter().enumerate() {
            if segment.len() != shape.segment_length() {
                return Err(KeyError::Malformed(format!(
                    "segment {} has {} characters, expected {}",
                    i + 1,
                    segment.len(),
                    shape.segment_length()
                )));
            }
            if let Some(bad) = segment.chars().find(|c| !is_key_char(*c)) {
                return Err(KeyError::Malformed(format!(
                    "segment {} contains '{bad}', only A-Z and 0-9 are allowed",
                    i + 1
                )));
            }
        }

        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dash-separated groups of this key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_SEPARATOR)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LicenseKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

/// Generate a key of the given shape from a cryptographically secure RNG.
pub fn generate_license_key<R: RngCore + CryptoRng>(shape: KeyShape, rng: &mut R) -> LicenseKey {
    let mut key = String::with_capacity(shape.key_len());

    for segment in 0..shape.segments() {
        if segment > 0 {
            key.push(KEY_SEPARATOR);
        }
        for _ in 0..shape.segment_length() {
            let idx = rng.gen_range(0..KEY_ALPHABET.len());
            key.push(KEY_ALPHABET[idx] as char);
        }
    }

    LicenseKey(key)
}

/// Generate a key of the given shape using the operating system RNG.
pub fn generate_with_os_rng(shape: KeyShape) -> LicenseKey {
    generate_license_key(shape, &mut rand::rngs::OsRng)
}

/// Generate a default `XXXX-XXXX-XXXX-XXXX` key using the operating system RNG.
pub fn generate_default_key() -> LicenseKey {
    generate_with_os_rng(KeyShape::default())
}
