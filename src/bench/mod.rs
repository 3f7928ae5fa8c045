use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
};

use crate::{
    black_box,
    config::BenchmarkProperties,
    error::{BoxError, ExecutionError, Failure, Iteration, Result, UsageError},
    stats::{SampleCollection, StatValues, Stats},
    time::Timestamp,
};


/// Type-erased benchmarked function.
type Benched<'a> = Box<dyn FnMut() -> Result<(), BoxError> + 'a>;

/// One benchmarked unit of work: a function plus the samples and stats of its
/// latest run.
///
/// # Examples
///
/// ```
/// use microbench::{BenchmarkProperties, Test};
///
/// let mut test = Test::new("sum", || (1..=1000).sum::<u64>());
///
/// let properties = BenchmarkProperties::from_value(serde_json::json!({ "iterations": 5 }))
///     .unwrap();
/// let stats = test.run(&properties).unwrap();
///
/// assert_eq!(stats.get("count"), Some(5.0));
/// ```
#[must_use = "a test must be run or added to a benchmark"]
pub struct Test<'a> {
    name: String,
    benched: Benched<'a>,

    /// Stats computed over the samples. The run's default stats are used
    /// while this is empty.
    stats: Stats,

    /// Recorded samples of the latest run.
    samples: SampleCollection,

    /// Values of the latest successful run.
    values: Option<StatValues>,
}

impl fmt::Debug for Test<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("name", &self.name)
            .field("stats", &self.stats)
            .field("sample_count", &self.samples.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Test<'a> {
    /// Creates a test that benchmarks `benched`.
    ///
    /// The output of each call is passed through [`black_box`] so that the
    /// work producing it is not optimized away.
    pub fn new<O>(name: impl Into<String>, mut benched: impl FnMut() -> O + 'a) -> Self {
        Self::from_boxed(
            name.into(),
            Box::new(move || {
                black_box(benched());
                Ok(())
            }),
        )
    }

    /// Creates a test that benchmarks a function that may fail.
    ///
    /// Returning `Err` aborts the run with an
    /// [`ExecutionError`](crate::ExecutionError).
    ///
    /// # Examples
    ///
    /// ```
    /// use microbench::Test;
    ///
    /// let test = Test::fallible("parse", || "42".parse::<u32>());
    /// ```
    pub fn fallible<O, E>(
        name: impl Into<String>,
        mut benched: impl FnMut() -> std::result::Result<O, E> + 'a,
    ) -> Self
    where
        E: Into<BoxError>,
    {
        Self::from_boxed(
            name.into(),
            Box::new(move || match benched() {
                Ok(output) => {
                    black_box(output);
                    Ok(())
                }
                Err(error) => Err(error.into()),
            }),
        )
    }

    fn from_boxed(name: String, benched: Benched<'a>) -> Self {
        Self {
            name,
            benched,
            stats: Stats::new(),
            samples: SampleCollection::default(),
            values: None,
        }
    }

    /// Computes `stats` for this test instead of the benchmark's defaults.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// The name results are reported under.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Samples recorded by the latest run, in order.
    #[inline]
    pub fn samples(&self) -> &SampleCollection {
        &self.samples
    }

    /// Stats set on this test with [`Test::with_stats`].
    ///
    /// Empty if the test uses the defaults of whichever properties it runs
    /// under.
    #[inline]
    pub fn stat_set(&self) -> &Stats {
        &self.stats
    }

    /// Returns the stat values of the latest successful run.
    pub fn stats(&self) -> Result<&StatValues, UsageError> {
        self.values.as_ref().ok_or_else(|| UsageError::NotRun { test: self.name.clone() })
    }

    /// Runs the benchmark loop and computes stats over the new samples.
    ///
    /// Samples from a previous run are discarded first. If the benchmarked
    /// function fails, the run stops at once and the partially filled
    /// samples are left for inspection, but [`Test::stats`] reports no result.
    pub fn run(&mut self, properties: &BenchmarkProperties) -> Result<&StatValues> {
        self.values = None;
        self.samples.reset(properties.iterations().get() as usize);

        tracing::debug!(
            test = %self.name,
            iterations = properties.iterations().get(),
            warmup = properties.warmup(),
            "running test"
        );

        if let Err(cause) = self.bench_loop(properties) {
            tracing::warn!(test = %self.name, error = %cause, "test failed");
            return Err(cause.into());
        }

        let samples = self.samples.values(properties.time_unit());
        let defaults;
        let stats = if self.stats.is_empty() {
            defaults = properties.build_stats();
            &defaults
        } else {
            &self.stats
        };
        let values = stats.calculate(&samples);

        tracing::debug!(
            test = %self.name,
            total = ?self.samples.total_duration(),
            "finished test"
        );

        Ok(&*self.values.insert(values))
    }

    /// Invokes the benchmarked function, timing each measured call.
    fn bench_loop(&mut self, properties: &BenchmarkProperties) -> Result<(), ExecutionError> {
        let Self { name, benched, samples, .. } = self;

        let mut iteration = Iteration::Warmup(0);

        // Panics abort the remaining iterations, like returned errors.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<(), Failure> {
            for n in 0..properties.warmup() {
                iteration = Iteration::Warmup(n);
                tracing::trace!(test = %name, n, "warmup");

                benched().map_err(Failure::Returned)?;
            }

            for n in 0..properties.iterations().get() {
                iteration = Iteration::Measured(n);

                let start = Timestamp::start();
                let result = benched();
                let end = Timestamp::end();

                result.map_err(Failure::Returned)?;
                samples.push(end.duration_since(start));
            }

            Ok(())
        }));

        let cause = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(failure)) => failure,
            Err(payload) => Failure::from_panic(payload),
        };

        Err(ExecutionError { test: name.clone(), iteration, cause })
    }
}
