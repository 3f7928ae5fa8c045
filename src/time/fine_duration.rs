use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// [Picosecond](https://en.wikipedia.org/wiki/Picosecond)-precise [`Duration`].
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FineDuration {
    /// The number of picoseconds.
    pub picos: u128,
}

impl FineDuration {
    /// A zero-length duration.
    pub const ZERO: Self = Self { picos: 0 };

    /// Returns `true` if no time elapsed.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.picos == 0
    }

    /// Converts this duration into a floating-point count of `unit`.
    ///
    /// Precision is lost for durations above 2^53 picoseconds (about 2.5
    /// hours), which is far beyond a single benchmarked invocation.
    #[inline]
    pub fn as_unit(self, unit: TimeUnit) -> f64 {
        self.picos as f64 / unit.picos() as f64
    }
}

impl From<Duration> for FineDuration {
    #[inline]
    fn from(duration: Duration) -> Self {
        // `Duration::MAX` in nanoseconds times 1000 still fits in `u128`.
        Self { picos: duration.as_nanos().saturating_mul(1_000) }
    }
}

impl fmt::Debug for FineDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let unit = TimeUnit::scale_of(*self);
        write!(f, "{}{}", self.as_unit(unit), unit.suffix())
    }
}

mod picos {
    pub const NANOS: u128 = 1_000;
    pub const MICROS: u128 = 1_000 * NANOS;
    pub const MILLIS: u128 = 1_000 * MICROS;
    pub const SEC: u128 = 1_000 * MILLIS;
}

/// The unit in which samples are handed to [`Stat`](crate::Stat)s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
pub enum TimeUnit {
    /// Picoseconds.
    #[serde(rename = "ps")]
    Picos,

    /// Nanoseconds.
    #[default]
    #[serde(rename = "ns")]
    Nanos,

    /// Microseconds.
    #[serde(rename = "us")]
    Micros,

    /// Milliseconds.
    #[serde(rename = "ms")]
    Millis,

    /// Seconds.
    #[serde(rename = "s")]
    Secs,
}

impl TimeUnit {
    /// All units from smallest to largest.
    pub const ALL: &'static [Self] =
        &[Self::Picos, Self::Nanos, Self::Micros, Self::Millis, Self::Secs];

    /// Returns the number of picoseconds in one of this unit.
    pub fn picos(self) -> u128 {
        use picos::*;

        match self {
            Self::Picos => 1,
            Self::Nanos => NANOS,
            Self::Micros => MICROS,
            Self::Millis => MILLIS,
            Self::Secs => SEC,
        }
    }

    /// Returns the unit suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Picos => "ps",
            Self::Nanos => "ns",
            Self::Micros => "us",
            Self::Millis => "ms",
            Self::Secs => "s",
        }
    }

    /// Parses a unit suffix as produced by [`TimeUnit::suffix`].
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|unit| unit.suffix() == suffix)
    }

    /// Determines the largest unit that keeps `duration` at or above 1.
    fn scale_of(duration: FineDuration) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|unit| duration.picos >= unit.picos())
            .unwrap_or(Self::Picos)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
