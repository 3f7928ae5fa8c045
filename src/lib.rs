#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bench;
mod benchmark;
mod config;
mod error;
mod stats;
mod time;

#[doc(inline)]
pub use std::hint::black_box;

pub use crate::{
    bench::Test,
    benchmark::{Benchmark, BenchmarkState, TestResult},
    config::{BenchmarkOptions, BenchmarkProperties, DEFAULT_ITERATIONS},
    error::{
        BoxError, ConfigError, Error, ExecutionError, Failure, Iteration, Result, UsageError,
    },
    stats::{
        Count, Max, Mean, Median, Min, Percentile, Sample, SampleCollection, Stat, StatKind,
        StatValues, Stats, StdDev, Sum, Variance,
    },
    time::{FineDuration, TimeUnit},
};
