//! Run with:
//!
//! ```sh
//! cargo bench -q -p demos --bench sort
//! ```

use microbench::{BenchmarkOptions, StatKind, Test, TimeUnit};

mod util;

const LEN: usize = 10_000;

fn main() {
    let random: Vec<i32> = {
        let mut rng = fastrand::Rng::with_seed(42);
        (0..LEN).map(|_| rng.i32(..)).collect()
    };
    let sorted: Vec<i32> = (0..LEN as i32).collect();

    let defaults = BenchmarkOptions::default()
        .iterations(50)
        .warmup(5)
        .stats([StatKind::Count, StatKind::Mean, StatKind::Median, StatKind::P95])
        .time_unit(TimeUnit::Micros);

    util::main(defaults, |benchmark| {
        // Every sort works on a fresh copy, so `clone` is the baseline to
        // subtract.
        benchmark
            .add(Test::new("random/clone", || random.clone()))
            .add(Test::new("random/sort", || {
                let mut v = random.clone();
                v.sort();
                v
            }))
            .add(Test::new("random/sort_unstable", || {
                let mut v = random.clone();
                v.sort_unstable();
                v
            }))
            .add(Test::new("sorted/sort", || {
                let mut v = sorted.clone();
                v.sort();
                v
            }))
            .add(Test::new("sorted/sort_unstable", || {
                let mut v = sorted.clone();
                v.sort_unstable();
                v
            }))
    });
}
