use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use serde::Serialize;

use tchisla_solver::{SearchMode, SolverConfig, solve_target};

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tchisla_solver")]
#[command(about = "Find the shortest expression of one repeated digit reaching a target value")]
#[command(version)]
struct CliArgs {
    /// Positive integer to reach
    target: i64,
    /// Seed digit 1..9; every digit is tried when omitted
    seed: Option<u32>,
    /// Print each completed generation's size
    #[arg(short = 't', long)]
    trace: bool,
    /// Keep irrational roots; give twice (-dd) for the deeper search
    #[arg(short = 'd', long = "deep_search", action = ArgAction::Count)]
    deep_search: u8,
    /// Deeper search: every root variant plus fourth roots everywhere
    #[arg(long = "deeper_search")]
    deeper_search: bool,
    /// Tolerance for treating a float as the nearby integer
    #[arg(long, default_value_t = 1e-8)]
    precision: f64,
    /// Reachable values larger than this are ignored
    #[arg(long = "value-max-limit", default_value_t = 1e12)]
    value_max_limit: f64,
    /// Reachable values smaller than this are ignored
    #[arg(long = "value-min-limit", default_value_t = 1e-8)]
    value_min_limit: f64,
    /// Largest exponent tried for powers
    #[arg(long = "power-limit", default_value_t = 40)]
    power_limit: i64,
    /// Largest operand tried for factorials
    #[arg(long = "factorial-limit", default_value_t = 15)]
    factorial_limit: i64,
    /// Generation size that switches the next pass to one thread per pair
    #[arg(long = "muilt-threads-threshold", default_value_t = 10_000)]
    multithread_threshold: usize,
    /// Maximum number of digit copies tried per seed
    #[arg(long = "search-depth", default_value_t = 20)]
    search_depth: usize,
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,
    /// Output one JSON object per seed
    #[arg(short, long)]
    json: bool,
}

#[derive(Serialize)]
struct SeedOutcome<'a> {
    target: i64,
    seed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    digits: Option<usize>,
}

fn init_logging(log_level: &LogLevel) {
    env_logger::Builder::from_default_env()
        .filter_level(log_level.to_log_level_filter())
        .init();
}

fn build_config(args: &CliArgs) -> SolverConfig {
    let mode = if args.deeper_search || args.deep_search >= 2 {
        SearchMode::Deeper
    } else if args.deep_search == 1 {
        SearchMode::Deep
    } else {
        SearchMode::Normal
    };
    SolverConfig {
        precision: args.precision,
        value_max_limit: args.value_max_limit,
        value_min_limit: args.value_min_limit,
        power_limit: args.power_limit,
        factorial_limit: args.factorial_limit,
        multithread_threshold: args.multithread_threshold,
        search_depth: args.search_depth,
        mode,
        trace: args.trace,
    }
}

fn report(target: i64, seed: u32, expression: Option<&str>, json: bool) -> Result<()> {
    if json {
        let outcome = SeedOutcome {
            target,
            seed,
            expression,
            digits: expression.map(|e| e.chars().filter(|c| c.is_ascii_digit()).count()),
        };
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        match expression {
            Some(expression) => println!("{} = {}", target, expression),
            None => println!("{} = Not Found", target),
        }
    }
    Ok(())
}

fn run(args: CliArgs) -> Result<()> {
    init_logging(&args.log_level);
    let config = build_config(&args);

    let seeds: Vec<u32> = match args.seed {
        Some(seed) => vec![seed],
        None => (1..=9).collect(),
    };
    info!(
        "searching for {} over seed digits {:?}",
        args.target, seeds
    );

    for seed in seeds {
        let outcome = solve_target(args.target, seed, &config)?;
        report(args.target, seed, outcome.as_deref(), args.json)?;
    }
    Ok(())
}

fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };
    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
