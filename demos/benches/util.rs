//! Shared driver for the demo benchmarks. Not directly runnable.

use clap::{value_parser, Arg, ArgAction, Command};
use microbench::{Benchmark, BenchmarkOptions, StatKind, TimeUnit};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    fn ignored_flag(name: &'static str) -> Arg {
        Arg::new(name).long(name).num_args(0).hide(true)
    }

    Command::new("microbench-demo")
        .arg(
            Arg::new("iterations")
                .long("iterations")
                .value_name("N")
                .help("Measured invocations per test")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("warmup")
                .long("warmup")
                .value_name("N")
                .help("Unmeasured invocations per test before measuring")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .value_name("NAMES")
                .help("Comma-separated stats to report, e.g. count,mean,p99")
                .value_delimiter(',')
                .value_parser(|name: &str| {
                    StatKind::from_name(name).ok_or_else(|| format!("unknown stat '{name}'"))
                }),
        )
        .arg(
            Arg::new("time-unit")
                .long("time-unit")
                .value_name("UNIT")
                .help("Unit of reported times: ps, ns, us, ms or s")
                .value_parser(|unit: &str| {
                    TimeUnit::from_suffix(unit).ok_or_else(|| format!("unknown time unit '{unit}'"))
                }),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(ArgAction::SetTrue),
        )
        // Passed by `cargo bench`:
        .args([ignored_flag("bench"), ignored_flag("nocapture"), ignored_flag("show-output")])
}

/// Builds the benchmark from CLI arguments layered over `defaults`, runs it
/// with `add_tests`, and prints the results.
pub fn main<'a>(
    defaults: BenchmarkOptions,
    add_tests: impl FnOnce(Benchmark<'a>) -> Benchmark<'a>,
) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("microbench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut command = command();
    let matches = command.get_matches_mut();

    let cli = BenchmarkOptions {
        iterations: matches.get_one::<i64>("iterations").copied(),
        warmup: matches.get_one::<i64>("warmup").copied(),
        stats: matches.get_many::<StatKind>("stats").map(|stats| stats.copied().collect()),
        time_unit: matches.get_one::<TimeUnit>("time-unit").copied(),
    };

    let benchmark = match Benchmark::with_options(&cli.overwrite(&defaults)) {
        Ok(benchmark) => benchmark,
        Err(error) => command.error(clap::error::ErrorKind::ValueValidation, error).exit(),
    };

    let mut benchmark = add_tests(benchmark.on_test_begin(|_, test| {
        eprintln!("Running '{}'", test.name());
    }));

    let unit = benchmark.properties().time_unit();

    let results = match benchmark.run() {
        Ok(results) => results,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(results) {
            Ok(json) => println!("{json}"),
            Err(error) => eprintln!("error: {error}"),
        }
        return;
    }

    for result in results {
        println!("{}", result.name);
        for (name, value) in result.stats.iter() {
            if name == "count" {
                println!("  {name:<10} {value}");
            } else {
                println!("  {name:<10} {value:.3}{unit}");
            }
        }
    }
}
