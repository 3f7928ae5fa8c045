use crate::time::{FineDuration, TimeUnit};

/// Measurement datum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    /// The time a single invocation took to run.
    pub duration: FineDuration,
}

/// [`Sample`] collection, in the order the samples were taken.
#[derive(Clone, Debug, Default)]
pub struct SampleCollection {
    /// Collected samples.
    pub all: Vec<Sample>,
}

impl SampleCollection {
    /// Number of samples taken.
    #[inline]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns `true` if no samples were taken.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Computes the total time across all samples.
    #[inline]
    pub fn total_duration(&self) -> FineDuration {
        FineDuration { picos: self.all.iter().map(|s| s.duration.picos).sum() }
    }

    /// Returns every sample duration expressed in `unit`.
    pub fn values(&self, unit: TimeUnit) -> Vec<f64> {
        self.all.iter().map(|s| s.duration.as_unit(unit)).collect()
    }

    #[inline]
    pub(crate) fn push(&mut self, duration: FineDuration) {
        self.all.push(Sample { duration });
    }

    /// Drops previous samples and makes room for `count` new ones.
    pub(crate) fn reset(&mut self, count: usize) {
        self.all.clear();
        self.all.reserve_exact(count);
    }
}
