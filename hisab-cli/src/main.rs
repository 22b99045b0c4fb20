//! # Hisab CLI
//!
//! Age, interest and Bikram Sambat conversion from the terminal.
//!
//! ## Usage
//! ```bash
//! # Age from a Gregorian birth date
//! hisab age 2000-03-15
//!
//! # Same, entered and shown in Bikram Sambat
//! hisab --calendar bs age 2056-12-02
//!
//! # Compound interest between two dates
//! hisab compound --principal 100000 --rate 10 --start 2023-01-01 --end 2024-01-01
//!
//! # Simple bank interest over 90 days, as JSON
//! hisab --json bank --principal 50000 --rate 7.5 --days 90
//!
//! # Convert a date to the other calendar
//! hisab convert 2081-01-01 --from bs
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use hisab::prelude::*;
use rust_decimal::Decimal;
use std::path::PathBuf;

mod config_loader;
mod render;

use config_loader::CliConfig;
use render::Conversion;

/// Age, interest and calendar calculator
#[derive(Parser, Debug)]
#[command(name = "hisab")]
#[command(author = "hisab contributors")]
#[command(version)]
#[command(about = "Age, interest and Bikram Sambat calculators", long_about = None)]
struct Args {
    /// Calendar for date arguments and output (AD or BS)
    #[arg(long, global = true)]
    calendar: Option<CalendarType>,

    /// Decimal places shown for amounts
    #[arg(long, global = true)]
    precision: Option<u32>,

    /// Output results as JSON
    #[arg(long, global = true, default_value = "false")]
    json: bool,

    /// Enable file logging to logs/ directory
    #[arg(long, global = true, default_value = "false")]
    log: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Age from a birth date
    Age {
        /// Birth date (YYYY-MM-DD)
        birth: String,

        /// Compute the age as of this date instead of now
        #[arg(long)]
        as_of: Option<String>,

        /// Rule for 29 February birthdays in common years
        #[arg(long)]
        leap_day_policy: Option<LeapDayPolicy>,

        #[arg(long)]
        label: Option<String>,
    },

    /// Compound interest between two dates
    Compound {
        #[arg(long)]
        principal: Decimal,

        /// Annual rate in percent
        #[arg(long)]
        rate: Decimal,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        #[arg(long)]
        label: Option<String>,

        /// Print the step-by-step explanation
        #[arg(long, default_value = "false")]
        explain: bool,
    },

    /// Simple bank interest over a day count or a date range
    Bank {
        #[arg(long)]
        principal: Decimal,

        /// Annual rate in percent
        #[arg(long)]
        rate: Decimal,

        /// Number of days
        #[arg(long, conflicts_with_all = ["start", "end"], required_unless_present_all = ["start", "end"])]
        days: Option<i64>,

        #[arg(long, requires = "end")]
        start: Option<String>,

        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Day-count basis (defaults to the configured value)
        #[arg(long)]
        year_days: Option<u32>,

        #[arg(long)]
        label: Option<String>,
    },

    /// Convert a date between AD and BS
    Convert {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Calendar the date is written in (defaults to --calendar)
        #[arg(long)]
        from: Option<CalendarType>,
    },
}

fn main() {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => CliConfig::load_from(path),
        None => CliConfig::load(),
    };
    let file_logging = loaded.as_ref().ok().and_then(|c| c.enable_logging).unwrap_or(false);

    let _file_guard = match init_tracing(args.log || file_logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    let file_config = match settle_config(loaded, args.config.is_some()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args, &file_config) {
        tracing::debug!(error = %e, "Command failed");
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// A file named with `--config` must load. A broken file at the default
/// location is reported and replaced by the defaults.
fn settle_config(loaded: Result<CliConfig, HisabError>, explicit: bool) -> Result<CliConfig, HisabError> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring config file");
            eprintln!("{} {}; using defaults", "warning:".yellow().bold(), e);
            Ok(CliConfig::default())
        }
    }
}

type WorkerGuard = tracing_appender::non_blocking::WorkerGuard;

/// Console logging to stderr, plus a daily rolling file when `to_file` is set.
fn init_tracing(to_file: bool) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if to_file {
        std::fs::create_dir_all("logs")?;

        let file_appender = tracing_appender::rolling::daily("logs", "hisab.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive("hisab=debug".parse()?);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .init();

        tracing::info!("--- Hisab Session Started [{}] ---", chrono::Local::now());
        Ok(Some(guard))
    } else {
        let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive("hisab=info".parse()?);
        tracing_subscriber::registry().with(env_filter).with(console_layer).init();
        Ok(None)
    }
}

/// Config file values, overridden by command-line flags.
fn effective_config(args: &Args, file: &CliConfig) -> Result<HisabConfig, HisabError> {
    let mut config = file.to_hisab_config()?;
    if let Some(calendar) = args.calendar {
        config = config.with_calendar(calendar);
    }
    if let Some(precision) = args.precision {
        config = config.with_display_precision(precision);
    }
    if let Commands::Age { leap_day_policy: Some(policy), .. } = &args.command {
        config = config.with_leap_day_policy(*policy);
    }
    config.validate()?;
    Ok(config)
}

fn evaluate<C: Calculate>(calc: &C, config: &HisabConfig) -> Result<C::Output, HisabError> {
    let label = calc.get_label();
    tracing::debug!(label = label.as_deref().unwrap_or("unlabelled"), "Running calculation");
    calc.calculate(config)
}

fn run(args: &Args, file: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config = effective_config(args, file)?;
    let calendar = config.default_calendar;
    let precision = config.display_precision;

    match &args.command {
        Commands::Age { birth, as_of, label, .. } => {
            let mut calc = AgeCalculator::new().born_on(DateInput::parse(birth, calendar)?);
            if let Some(as_of) = as_of {
                calc = calc.as_of(DateInput::parse(as_of, calendar)?.resolve()?);
            }
            if let Some(label) = label {
                calc = calc.label(label.as_str());
            }

            let result = evaluate(&calc, &config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render::age(&result, calendar)?);
            }
        }

        Commands::Compound { principal, rate, start, end, label, explain } => {
            let mut calc = CompoundInterestCalculator::new()
                .principal(*principal)
                .rate(*rate)
                .start(DateInput::parse(start, calendar)?)
                .end(DateInput::parse(end, calendar)?);
            if let Some(label) = label {
                calc = calc.label(label.as_str());
            }

            let result = evaluate(&calc, &config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if *explain {
                println!("{}", result.explain_with(precision));
            } else {
                println!("{}", render::interest(&result, precision));
            }
        }

        Commands::Bank { principal, rate, days, start, end, year_days, label } => {
            let mut calc = BankInterestCalculator::new().principal(*principal).rate(*rate);
            if let Some(days) = days {
                calc = calc.days(*days);
            }
            if let Some(start) = start {
                calc = calc.start(DateInput::parse(start, calendar)?);
            }
            if let Some(end) = end {
                calc = calc.end(DateInput::parse(end, calendar)?);
            }
            if let Some(year_days) = year_days {
                calc = calc.year_days(*year_days);
            }
            if let Some(label) = label {
                calc = calc.label(label.as_str());
            }

            let result = evaluate(&calc, &config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render::bank(&result, precision));
            }
        }

        Commands::Convert { date, from } => {
            let bs = match DateInput::parse(date, from.unwrap_or(calendar))? {
                DateInput::Bs(bs) => bs,
                DateInput::Ad(instant) => to_bikram_sambat(instant)?,
            };
            let conversion = Conversion::new(bs)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                println!("{}", render::conversion(&conversion));
            }
        }
    }

    Ok(())
}
