//! Built-in statistics.
//!
//! Every built-in is total: on an empty sample slice it reports `0`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::stats::Stat;

/// Identifies a built-in [`Stat`].
///
/// This is the registry used by configuration: each identifier maps to a
/// factory via [`StatKind::build`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// [`Count`].
    Count,
    /// [`Sum`].
    Sum,
    /// [`Mean`].
    Mean,
    /// [`Min`].
    Min,
    /// [`Max`].
    Max,
    /// [`Median`].
    Median,
    /// [`Variance`].
    Variance,
    /// [`StdDev`].
    StdDev,
    /// 90th [`Percentile`].
    P90,
    /// 95th [`Percentile`].
    P95,
    /// 99th [`Percentile`].
    P99,
}

impl StatKind {
    /// Every built-in stat, in reporting order.
    pub const ALL: &'static [Self] = &[
        Self::Count,
        Self::Sum,
        Self::Mean,
        Self::Min,
        Self::Max,
        Self::Median,
        Self::Variance,
        Self::StdDev,
        Self::P90,
        Self::P95,
        Self::P99,
    ];

    /// Stats attached to tests that were not given their own.
    pub const DEFAULT: &'static [Self] =
        &[Self::Count, Self::Mean, Self::Min, Self::Max, Self::Median, Self::StdDev];

    /// The name the built stat reports under.
    pub fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
            Self::Variance => "variance",
            Self::StdDev => "std_dev",
            Self::P90 => "p90",
            Self::P95 => "p95",
            Self::P99 => "p99",
        }
    }

    /// Looks up a built-in by its reported name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Instantiates the stat.
    pub fn build(self) -> Box<dyn Stat> {
        match self {
            Self::Count => Box::new(Count),
            Self::Sum => Box::new(Sum),
            Self::Mean => Box::new(Mean),
            Self::Min => Box::new(Min),
            Self::Max => Box::new(Max),
            Self::Median => Box::new(Median),
            Self::Variance => Box::new(Variance),
            Self::StdDev => Box::new(StdDev),
            Self::P90 => Box::new(Percentile::new("p90", 90.0)),
            Self::P95 => Box::new(Percentile::new("p95", 95.0)),
            Self::P99 => Box::new(Percentile::new("p99", 99.0)),
        }
    }
}

/// Number of samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl Stat for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        samples.len() as f64
    }
}

/// Sum of all samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl Stat for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        samples.iter().sum()
    }
}

/// Arithmetic mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

impl Stat for Mean {
    fn name(&self) -> &str {
        "mean"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        mean(samples).unwrap_or_default()
    }
}

/// Fastest sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct Min;

impl Stat for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        samples.iter().copied().min_by(total_cmp).unwrap_or_default()
    }
}

/// Slowest sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct Max;

impl Stat for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        samples.iter().copied().max_by(total_cmp).unwrap_or_default()
    }
}

/// Midpoint sample, or the average of the two middle samples for an even
/// count.
#[derive(Clone, Copy, Debug, Default)]
pub struct Median;

impl Stat for Median {
    fn name(&self) -> &str {
        "median"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        let sorted = sorted(samples);
        let count = sorted.len();

        if count == 0 {
            0.0
        } else if count % 2 == 0 {
            // Take average of two middle numbers.
            (sorted[count / 2] + sorted[(count / 2) - 1]) / 2.0
        } else {
            // Single middle number.
            sorted[count / 2]
        }
    }
}

/// Unbiased sample variance (Bessel's correction).
///
/// Fewer than two samples have no spread and report `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Variance;

impl Stat for Variance {
    fn name(&self) -> &str {
        "variance"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        variance(samples)
    }
}

/// Sample standard deviation, the square root of [`Variance`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDev;

impl Stat for StdDev {
    fn name(&self) -> &str {
        "std_dev"
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        variance(samples).sqrt()
    }
}

/// Percentile with linear interpolation between nearest ranks.
#[derive(Clone, Debug)]
pub struct Percentile {
    name: String,
    percent: f64,
}

impl Percentile {
    /// Creates a percentile stat reporting under `name`.
    ///
    /// `percent` is clamped to `0..=100`. NaN is treated as `0`.
    pub fn new(name: impl Into<String>, percent: f64) -> Self {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        Self { name: name.into(), percent }
    }
}

impl Stat for Percentile {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, samples: &[f64]) -> f64 {
        let sorted = sorted(samples);

        match sorted.len() {
            0 => 0.0,
            1 => sorted[0],
            n => {
                let rank = self.percent / 100.0 * (n - 1) as f64;
                let lower = rank.floor() as usize;
                let upper = (lower + 1).min(n - 1);
                let fraction = rank - lower as f64;

                sorted[lower] + fraction * (sorted[upper] - sorted[lower])
            }
        }
    }
}

fn total_cmp(a: &f64, b: &f64) -> Ordering {
    a.total_cmp(b)
}

fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(total_cmp);
    sorted
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

fn variance(samples: &[f64]) -> f64 {
    match mean(samples) {
        Some(mean) if samples.len() >= 2 => {
            let squares: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            squares / (samples.len() - 1) as f64
        }
        _ => 0.0,
    }
}
