use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    stats::{StatKind, Stats},
    time::TimeUnit,
};

/// Number of measured iterations when none is configured.
pub const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Benchmark options as provided by the user, before validation.
///
/// Every field is optional; unset fields take their defaults when turned into
/// [`BenchmarkProperties`]. Unknown keys are rejected when deserializing.
///
/// # Examples
///
/// ```
/// use microbench::{BenchmarkOptions, BenchmarkProperties, StatKind};
///
/// let properties = BenchmarkOptions::default()
///     .iterations(5)
///     .stats([StatKind::Count, StatKind::Mean])
///     .validate()
///     .unwrap();
///
/// assert_eq!(properties.iterations().get(), 5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkOptions {
    /// The number of measured invocations per test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<i64>,

    /// The number of unmeasured invocations per test before measuring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup: Option<i64>,

    /// Stats attached to tests that have none of their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<StatKind>>,

    /// The unit samples are reported in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<TimeUnit>,
}

impl BenchmarkOptions {
    /// Parses options from a loosely-typed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parses options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets [`BenchmarkOptions::iterations`].
    #[must_use]
    pub fn iterations(mut self, iterations: i64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Sets [`BenchmarkOptions::warmup`].
    #[must_use]
    pub fn warmup(mut self, warmup: i64) -> Self {
        self.warmup = Some(warmup);
        self
    }

    /// Sets [`BenchmarkOptions::stats`].
    #[must_use]
    pub fn stats(mut self, stats: impl IntoIterator<Item = StatKind>) -> Self {
        self.stats = Some(stats.into_iter().collect());
        self
    }

    /// Sets [`BenchmarkOptions::time_unit`].
    #[must_use]
    pub fn time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = Some(time_unit);
        self
    }

    /// Overwrites `other` with values set in `self`.
    #[must_use]
    pub fn overwrite(&self, other: &Self) -> Self {
        Self {
            iterations: self.iterations.or(other.iterations),
            warmup: self.warmup.or(other.warmup),
            stats: self.stats.clone().or_else(|| other.stats.clone()),
            time_unit: self.time_unit.or(other.time_unit),
        }
    }

    /// Validates these options. See [`BenchmarkProperties::new`].
    pub fn validate(&self) -> Result<BenchmarkProperties, ConfigError> {
        BenchmarkProperties::new(self)
    }
}

/// Validated configuration shared by every test in a benchmark run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BenchmarkProperties {
    iterations: NonZeroU32,
    warmup: u32,
    stats: Vec<StatKind>,
    time_unit: TimeUnit,
}

impl Default for BenchmarkProperties {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            warmup: 0,
            stats: StatKind::DEFAULT.to_vec(),
            time_unit: TimeUnit::default(),
        }
    }
}

impl BenchmarkProperties {
    /// Validates `options`, filling unset fields with defaults.
    ///
    /// Fails if `iterations` is not positive, `warmup` is negative, either
    /// does not fit in 32 bits, or `stats` names a stat twice.
    pub fn new(options: &BenchmarkOptions) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let iterations = match options.iterations {
            None => defaults.iterations,
            Some(value) => u32::try_from(value)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or(ConfigError::InvalidIterations { value })?,
        };

        let warmup = match options.warmup {
            None => defaults.warmup,
            Some(value) => {
                u32::try_from(value).map_err(|_| ConfigError::InvalidWarmup { value })?
            }
        };

        let stats = options.stats.clone().unwrap_or(defaults.stats);

        // Surface duplicates now rather than when the first test runs.
        Stats::from_kinds(&stats)?;

        Ok(Self {
            iterations,
            warmup,
            stats,
            time_unit: options.time_unit.unwrap_or(defaults.time_unit),
        })
    }

    /// Parses and validates a loosely-typed JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use microbench::BenchmarkProperties;
    /// use serde_json::json;
    ///
    /// let properties =
    ///     BenchmarkProperties::from_value(json!({ "iterations": 5, "stats": ["count"] }))
    ///         .unwrap();
    /// assert_eq!(properties.iterations().get(), 5);
    ///
    /// assert!(BenchmarkProperties::from_value(json!({ "iterations": 0 })).is_err());
    /// assert!(BenchmarkProperties::from_value(json!({ "repeat": 3 })).is_err());
    /// ```
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Self::new(&BenchmarkOptions::from_value(value)?)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(&BenchmarkOptions::from_json(json)?)
    }

    /// The number of measured invocations per test.
    #[inline]
    pub fn iterations(&self) -> NonZeroU32 {
        self.iterations
    }

    /// The number of unmeasured invocations per test before measuring.
    #[inline]
    pub fn warmup(&self) -> u32 {
        self.warmup
    }

    /// Identifiers of the stats attached to tests that have none of their own.
    #[inline]
    pub fn stats(&self) -> &[StatKind] {
        &self.stats
    }

    /// The unit samples are reported in.
    #[inline]
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Instantiates the default stats for a test.
    pub fn build_stats(&self) -> Stats {
        // Duplicates were rejected in `new`, so this cannot fail.
        Stats::from_kinds(&self.stats).unwrap_or_default()
    }
}

impl TryFrom<BenchmarkOptions> for BenchmarkProperties {
    type Error = ConfigError;

    fn try_from(options: BenchmarkOptions) -> Result<Self, Self::Error> {
        Self::new(&options)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let properties = BenchmarkProperties::new(&BenchmarkOptions::default()).unwrap();

        assert_eq!(properties, BenchmarkProperties::default());
        assert_eq!(properties.iterations(), DEFAULT_ITERATIONS);
        assert_eq!(properties.warmup(), 0);
        assert_eq!(properties.stats(), StatKind::DEFAULT);
        assert_eq!(properties.time_unit(), TimeUnit::Nanos);
    }

    #[test]
    fn from_loose_value() {
        let properties = BenchmarkProperties::from_value(json!({
            "iterations": 5,
            "warmup": 2,
            "stats": ["count", "p99", "std_dev"],
            "time_unit": "us",
        }))
        .unwrap();

        assert_eq!(properties.iterations().get(), 5);
        assert_eq!(properties.warmup(), 2);
        assert_eq!(properties.stats(), [StatKind::Count, StatKind::P99, StatKind::StdDev]);
        assert_eq!(properties.time_unit(), TimeUnit::Micros);

        let names: Vec<_> = properties.build_stats().names().map(String::from).collect();
        assert_eq!(names, ["count", "p99", "std_dev"]);
    }

    #[test]
    fn out_of_range_iterations() {
        for value in [0, -1, i64::from(u32::MAX) + 1] {
            let result = BenchmarkOptions::default().iterations(value).validate();
            assert!(
                matches!(result, Err(ConfigError::InvalidIterations { value: v }) if v == value),
                "{value}"
            );
        }

        let max = BenchmarkOptions::default().iterations(u32::MAX.into()).validate().unwrap();
        assert_eq!(max.iterations().get(), u32::MAX);
    }

    #[test]
    fn negative_warmup() {
        let result = BenchmarkOptions::default().warmup(-3).validate();
        assert!(matches!(result, Err(ConfigError::InvalidWarmup { value: -3 })));
    }

    #[test]
    fn invalid_types_and_keys() {
        let inputs = [
            json!({ "iterations": "ten" }),
            json!({ "iterations": 2.5 }),
            json!({ "stats": "count" }),
            json!({ "stats": ["count", "mode"] }),
            json!({ "time_unit": "fortnight" }),
            json!({ "iterations": 5, "verbose": true }),
            json!(5),
        ];

        for input in inputs {
            let result = BenchmarkProperties::from_value(input.clone());
            assert!(matches!(result, Err(ConfigError::Parse(_))), "{input}");
        }
    }

    #[test]
    fn duplicate_stats() {
        let result = BenchmarkProperties::from_json(r#"{ "stats": ["min", "max", "min"] }"#);
        assert!(matches!(result, Err(ConfigError::DuplicateStat { ref name }) if name == "min"));
    }

    #[test]
    fn overwrite_prefers_self() {
        let base = BenchmarkOptions::default().iterations(10).warmup(1);
        let user = BenchmarkOptions::default().iterations(3).time_unit(TimeUnit::Millis);

        let merged = user.overwrite(&base);
        assert_eq!(merged.iterations, Some(3));
        assert_eq!(merged.warmup, Some(1));
        assert_eq!(merged.stats, None);
        assert_eq!(merged.time_unit, Some(TimeUnit::Millis));
    }

    #[test]
    fn options_round_trip_through_json() {
        let options = BenchmarkOptions::default().iterations(7).stats([StatKind::Median]);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"iterations":7,"stats":["median"]}"#);
        assert_eq!(BenchmarkOptions::from_json(&json).unwrap(), options);
    }
}
