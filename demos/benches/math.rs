//! Run with:
//!
//! ```sh
//! cargo bench -q -p demos --bench math
//! ```

use std::collections::{BTreeMap, HashMap};

use microbench::{black_box, BenchmarkOptions, Test};

mod util;

fn main() {
    let defaults = BenchmarkOptions::default().iterations(1000).warmup(10);

    util::main(defaults, |benchmark| {
        benchmark
            .add(Test::new("add", || black_box(2i32) + black_box(1)))
            .add(Test::new("mul", || black_box(2i32) * black_box(3)))
            .add(Test::new("div", || black_box(12u32) / black_box(4)))
            .add(Test::fallible("checked_div", || {
                black_box(12u32).checked_div(black_box(4)).ok_or("division by zero")
            }))
            .add(Test::new("fibonacci/iterative", || fibonacci::iterative(black_box(20))))
            .add(Test::new("fibonacci/recursive", || fibonacci::recursive(black_box(20))))
            .add(Test::new("fibonacci/hashmap", || fibonacci::hashmap(black_box(20))))
            .add(Test::new("fibonacci/btreemap", || fibonacci::btreemap(black_box(20))))
    });
}

mod fibonacci {
    use super::*;

    pub fn iterative(n: u64) -> u64 {
        let mut previous = 1;
        let mut current = 1;

        for _ in 2..=n {
            let next = previous + current;
            previous = current;
            current = next;
        }

        current
    }

    pub fn recursive(n: u64) -> u64 {
        if n <= 1 {
            1
        } else {
            recursive(n - 2) + recursive(n - 1)
        }
    }

    trait Map {
        fn get(&self, key: u64) -> Option<u64>;
        fn set(&mut self, key: u64, value: u64);
    }

    impl Map for HashMap<u64, u64> {
        fn get(&self, key: u64) -> Option<u64> {
            self.get(&key).copied()
        }

        fn set(&mut self, key: u64, value: u64) {
            self.insert(key, value);
        }
    }

    impl Map for BTreeMap<u64, u64> {
        fn get(&self, key: u64) -> Option<u64> {
            self.get(&key).copied()
        }

        fn set(&mut self, key: u64, value: u64) {
            self.insert(key, value);
        }
    }

    fn memoized(n: u64, cache: &mut impl Map) -> u64 {
        if n <= 1 {
            return 1;
        }

        if let Some(value) = cache.get(n) {
            return value;
        }

        let value = memoized(n - 2, cache) + memoized(n - 1, cache);
        cache.set(n, value);
        value
    }

    pub fn hashmap(n: u64) -> u64 {
        memoized(n, &mut HashMap::new())
    }

    pub fn btreemap(n: u64) -> u64 {
        memoized(n, &mut BTreeMap::new())
    }
}
