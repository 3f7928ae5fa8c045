//! Measurement statistics.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ConfigError;

mod kinds;
mod sample;

pub use kinds::*;
pub use sample::*;

/// A named reducer from a sample sequence to one summary number.
///
/// Implementations must be pure: the same samples always produce the same
/// value, and the input is never modified. They must also be total, returning
/// a value even for an empty slice.
///
/// # Examples
///
/// ```
/// use microbench::{Stat, Stats};
///
/// struct Range;
///
/// impl Stat for Range {
///     fn name(&self) -> &str {
///         "range"
///     }
///
///     fn calculate(&self, samples: &[f64]) -> f64 {
///         let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
///         let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
///         if samples.is_empty() { 0.0 } else { max - min }
///     }
/// }
///
/// let mut stats = Stats::new();
/// stats.add(Range).unwrap();
/// assert_eq!(stats.calculate(&[3.0, 1.0, 4.0]).get("range"), Some(3.0));
/// ```
pub trait Stat: Send + Sync {
    /// The key under which this statistic's value is reported.
    fn name(&self) -> &str;

    /// Reduces `samples` to a single value.
    fn calculate(&self, samples: &[f64]) -> f64;
}

/// An ordered collection of [`Stat`]s with unique names.
#[derive(Default)]
pub struct Stats {
    stats: Vec<Box<dyn Stat>>,
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Stats {
    /// Creates an empty collection.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from built-in stat identifiers, keeping their order.
    pub fn from_kinds(kinds: &[StatKind]) -> Result<Self, ConfigError> {
        let mut stats = Self::new();
        for kind in kinds {
            stats.add_boxed(kind.build())?;
        }
        Ok(stats)
    }

    /// Appends `stat`.
    ///
    /// Fails if a stat with the same name is already present, in which case
    /// the collection is left untouched.
    pub fn add(&mut self, stat: impl Stat + 'static) -> Result<&mut Self, ConfigError> {
        self.add_boxed(Box::new(stat))
    }

    /// Appends an already boxed `stat`. See [`Stats::add`].
    pub fn add_boxed(&mut self, stat: Box<dyn Stat>) -> Result<&mut Self, ConfigError> {
        if self.contains(stat.name()) {
            return Err(ConfigError::DuplicateStat { name: stat.name().to_owned() });
        }
        self.stats.push(stat);
        Ok(self)
    }

    /// Returns `true` if a stat named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.stats.iter().any(|stat| stat.name() == name)
    }

    /// Number of stats in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns `true` if the set holds no stats.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Stat names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(|stat| stat.name())
    }

    /// Applies every stat, in insertion order, to the same `samples`.
    pub fn calculate(&self, samples: &[f64]) -> StatValues {
        StatValues {
            entries: self
                .stats
                .iter()
                .map(|stat| (stat.name().to_owned(), stat.calculate(samples)))
                .collect(),
        }
    }
}

/// Computed statistic values keyed by stat name, in [`Stats`] order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatValues {
    entries: Vec<(String, f64)>,
}

impl StatValues {
    /// Returns the value computed by the stat named `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(key, _)| key == name).map(|&(_, value)| value)
    }

    /// Number of computed values.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no values were computed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stat names in computation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(name, value)` pairs in computation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

// Serialized as a map so that consumers see `{ "count": 5.0, ... }` in order.
impl Serialize for StatValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
