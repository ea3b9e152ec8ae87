//! Storage capacity value object
//!
//! Capacities use decimal units: 1 KB is 1000 bytes, 1 MB is 1000 KB.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::value_error::ValueParseError;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.[0-9]+)?)\s*([a-zA-Z]+)$")
        .expect("size pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 6] = [
        SizeUnit::B,
        SizeUnit::KB,
        SizeUnit::MB,
        SizeUnit::GB,
        SizeUnit::TB,
        SizeUnit::PB,
    ];

    /// Power of 1000 this unit represents (KB => 1, MB => 2, ...)
    #[must_use]
    pub const fn exponent(self) -> i32 {
        match self {
            Self::B => 0,
            Self::KB => 1,
            Self::MB => 2,
            Self::GB => 3,
            Self::TB => 4,
            Self::PB => 5,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::KB => "KB",
            Self::MB => "MB",
            Self::GB => "GB",
            Self::TB => "TB",
            Self::PB => "PB",
        }
    }

    fn valid_labels() -> String {
        Self::ALL
            .iter()
            .map(|unit| unit.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SizeUnit {
    type Err = ValueParseError;

    /// Case-insensitive: `gb`, `Gb` and `GB` are all gigabytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = s.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.label() == unit)
            .ok_or_else(|| ValueParseError::UnknownUnit {
                unit,
                valid: Self::valid_labels(),
            })
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable size in bytes.
///
/// Equality and hashing compare the exact bit pattern of the byte count, so two
/// sizes are the same set member only when they are bit-for-bit identical.
#[derive(Debug, Clone, Copy)]
pub struct ByteSize {
    bytes: f64,
}

impl ByteSize {
    #[must_use]
    pub fn new(magnitude: f64, unit: SizeUnit) -> Self {
        Self {
            bytes: magnitude * 1000_f64.powi(unit.exponent()),
        }
    }

    /// Parse `"<number><optional space><unit>"`, e.g. `"2 GB"`, `"500MB"` or `"1,024 GB"`.
    pub fn parse(size: &str) -> Result<Self, ValueParseError> {
        let captures = SIZE_PATTERN
            .captures(size.trim())
            .ok_or_else(|| ValueParseError::invalid_format("size", size))?;

        let magnitude: f64 = captures[1]
            .replace(',', "")
            .parse()
            .map_err(|_| ValueParseError::invalid_format("size", size))?;
        let unit: SizeUnit = captures[2].parse()?;

        Ok(Self::new(magnitude, unit))
    }

    #[must_use]
    pub const fn bytes(&self) -> f64 {
        self.bytes
    }

    #[must_use]
    pub fn kilobytes(&self) -> f64 {
        self.bytes / 1000.0
    }

    #[must_use]
    pub fn megabytes(&self) -> f64 {
        self.kilobytes() / 1000.0
    }

    #[must_use]
    pub fn gigabytes(&self) -> f64 {
        self.megabytes() / 1000.0
    }

    #[must_use]
    pub fn terabytes(&self) -> f64 {
        self.gigabytes() / 1000.0
    }

    #[must_use]
    pub fn petabytes(&self) -> f64 {
        self.terabytes() / 1000.0
    }
}

impl PartialEq for ByteSize {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.to_bits() == other.bytes.to_bits()
    }
}

impl Eq for ByteSize {}

impl Hash for ByteSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.to_bits().hash(state);
    }
}

impl FromStr for ByteSize {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MB", self.megabytes())
    }
}
