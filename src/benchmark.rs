use std::{
    fmt, mem,
    panic::{self, AssertUnwindSafe},
};

use serde::Serialize;

use crate::{
    bench::Test,
    config::{BenchmarkOptions, BenchmarkProperties},
    error::{ConfigError, Result},
    stats::StatValues,
};

/// Callback receiving the benchmark.
type Hook<'a> = Box<dyn FnMut(&Benchmark<'a>) + 'a>;

/// Callback receiving the benchmark and the current test.
type TestHook<'a> = Box<dyn FnMut(&Benchmark<'a>, &Test<'a>) + 'a>;

/// Lifecycle callbacks. Each defaults to a no-op.
struct Hooks<'a> {
    on_begin: Hook<'a>,
    on_test_begin: TestHook<'a>,
    on_test_end: TestHook<'a>,
    on_end: Hook<'a>,
}

impl Default for Hooks<'_> {
    fn default() -> Self {
        Self {
            on_begin: Box::new(|_| {}),
            on_test_begin: Box::new(|_, _| {}),
            on_test_end: Box::new(|_, _| {}),
            on_end: Box::new(|_| {}),
        }
    }
}

/// Where a [`Benchmark`] is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkState {
    /// Not run yet.
    #[default]
    Created,

    /// Inside [`Benchmark::run`]. Only observable from hooks.
    Running,

    /// The latest run finished every test.
    Completed,

    /// The latest run stopped at a failing test.
    Aborted,
}

/// The stats of one test within a benchmark run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TestResult {
    /// The name of the test.
    pub name: String,
    /// Stat values computed over the test's samples.
    pub stats: StatValues,
}

/// Runs a list of [`Test`]s under shared [`BenchmarkProperties`].
///
/// # Examples
///
/// ```
/// use microbench::{Benchmark, BenchmarkOptions, Test};
///
/// let mut benchmark = Benchmark::with_options(&BenchmarkOptions::default().iterations(5))
///     .unwrap()
///     .add(Test::new("sum", || (1..=1000).sum::<u64>()))
///     .add(Test::new("product", || (1..=20).product::<u64>()))
///     .on_test_end(|_, test| println!("finished {}", test.name()));
///
/// let results = benchmark.run().unwrap();
///
/// assert_eq!(results[0].name, "sum");
/// assert_eq!(results[0].stats.get("count"), Some(5.0));
/// assert_eq!(results[1].name, "product");
/// ```
#[must_use = "a benchmark does nothing until run"]
pub struct Benchmark<'a> {
    properties: BenchmarkProperties,
    tests: Vec<Test<'a>>,
    results: Vec<TestResult>,
    state: BenchmarkState,
    hooks: Hooks<'a>,
}

impl Default for Benchmark<'_> {
    fn default() -> Self {
        Self::new(BenchmarkProperties::default())
    }
}

impl fmt::Debug for Benchmark<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("properties", &self.properties)
            .field("tests", &self.tests)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> Benchmark<'a> {
    /// Creates an empty benchmark.
    pub fn new(properties: BenchmarkProperties) -> Self {
        Self {
            properties,
            tests: Vec::new(),
            results: Vec::new(),
            state: BenchmarkState::Created,
            hooks: Hooks::default(),
        }
    }

    /// Creates an empty benchmark from unvalidated options.
    pub fn with_options(options: &BenchmarkOptions) -> Result<Self, ConfigError> {
        BenchmarkProperties::new(options).map(Self::new)
    }

    /// Creates an empty benchmark from a loosely-typed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        BenchmarkProperties::from_value(value).map(Self::new)
    }

    /// Appends a test. Tests run in the order they were added.
    pub fn add(mut self, test: Test<'a>) -> Self {
        self.tests.push(test);
        self
    }

    /// Calls `f` once at the start of each run.
    pub fn on_begin(mut self, f: impl FnMut(&Benchmark<'a>) + 'a) -> Self {
        self.hooks.on_begin = Box::new(f);
        self
    }

    /// Calls `f` before each test runs.
    pub fn on_test_begin(mut self, f: impl FnMut(&Benchmark<'a>, &Test<'a>) + 'a) -> Self {
        self.hooks.on_test_begin = Box::new(f);
        self
    }

    /// Calls `f` after each test has run and its result was recorded.
    pub fn on_test_end(mut self, f: impl FnMut(&Benchmark<'a>, &Test<'a>) + 'a) -> Self {
        self.hooks.on_test_end = Box::new(f);
        self
    }

    /// Calls `f` once after every test has run.
    ///
    /// Not called when a test fails.
    pub fn on_end(mut self, f: impl FnMut(&Benchmark<'a>) + 'a) -> Self {
        self.hooks.on_end = Box::new(f);
        self
    }

    /// Configuration shared by every test.
    #[inline]
    pub fn properties(&self) -> &BenchmarkProperties {
        &self.properties
    }

    /// Tests in the order they run.
    #[inline]
    pub fn tests(&self) -> &[Test<'a>] {
        &self.tests
    }

    /// Results of the latest run, in test order.
    ///
    /// During a run this holds the tests finished so far.
    #[inline]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Where the benchmark is in its lifecycle.
    #[inline]
    pub fn state(&self) -> BenchmarkState {
        self.state
    }

    /// Runs every test in order and returns their results.
    ///
    /// Results of a previous run are discarded first, so running twice yields
    /// one entry per test. The first failing test stops the run and its error
    /// is returned; results of the tests before it stay available through
    /// [`Benchmark::results`].
    ///
    /// A panic raised by a hook propagates to the caller after the state is
    /// set to [`BenchmarkState::Aborted`]. Registered hooks are kept.
    pub fn run(&mut self) -> Result<&[TestResult]> {
        // Hooks borrow the benchmark, so they are moved out while running.
        let mut hooks = mem::take(&mut self.hooks);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_with(&mut hooks)));
        self.hooks = hooks;

        match outcome {
            Ok(outcome) => outcome.map(|()| self.results.as_slice()),

            // A panicking hook leaves the benchmark reusable.
            Err(payload) => {
                self.state = BenchmarkState::Aborted;
                panic::resume_unwind(payload)
            }
        }
    }

    fn run_with(&mut self, hooks: &mut Hooks<'a>) -> Result<()> {
        self.results.clear();
        self.results.reserve_exact(self.tests.len());
        self.state = BenchmarkState::Running;

        tracing::info!(
            tests = self.tests.len(),
            iterations = self.properties.iterations().get(),
            "starting benchmark"
        );

        (hooks.on_begin)(self);

        for index in 0..self.tests.len() {
            (hooks.on_test_begin)(self, &self.tests[index]);

            let test = &mut self.tests[index];
            let stats = match test.run(&self.properties) {
                Ok(stats) => stats.clone(),
                Err(error) => {
                    self.state = BenchmarkState::Aborted;
                    return Err(error);
                }
            };
            self.results.push(TestResult { name: test.name().to_owned(), stats });

            (hooks.on_test_end)(self, &self.tests[index]);
        }

        (hooks.on_end)(self);
        self.state = BenchmarkState::Completed;

        tracing::info!(tests = self.results.len(), "finished benchmark");

        Ok(())
    }
}
