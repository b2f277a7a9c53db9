//! VIX Index CLI
//!
//! Command-line interface for single-name and composite volatility indices.
//!
//! # Commands
//!
//! - `vix single <TICKER>` - index for one underlying
//! - `vix composite [--label L]` - configured composites
//! - `vix fetch <TICKER>... --output FILE` - record live data for offline runs

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vix_index::prelude::*;

#[derive(Parser)]
#[command(name = "vix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "vix.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the index for a single underlying
    Single {
        ticker: String,

        /// Use a recorded snapshot instead of live data
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Compute configured composites
    Composite {
        /// Only this composite (default: all)
        #[arg(short, long)]
        label: Option<String>,

        /// Use a recorded snapshot instead of live data
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Record near/next-term chains and the yield curve to a JSON snapshot
    Fetch {
        /// Tickers to record (default: every configured ticker)
        tickers: Vec<String>,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        match VixConfig::load(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        VixConfig::default()
    };

    init_tracing(&config, cli.verbose);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &VixConfig, verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config: &VixConfig) -> VixResult<()> {
    match command {
        Commands::Single { ticker, snapshot } => match snapshot {
            Some(path) => {
                let data = MarketSnapshot::load(&path)?;
                single(&VixEngine::new(&data, &data), &ticker)
            }
            None => single(&live_engine(config)?, &ticker),
        },
        Commands::Composite { label, snapshot } => {
            let composites = selected_composites(config, label.as_deref())?;
            match snapshot {
                Some(path) => {
                    let data = MarketSnapshot::load(&path)?;
                    composite(&VixEngine::new(&data, &data), &composites)
                }
                None => composite(&live_engine(config)?, &composites),
            }
        }
        Commands::Fetch { tickers, output } => {
            let tickers = if tickers.is_empty() {
                config.all_tickers()
            } else {
                tickers
            };
            fetch(config, &tickers, &output)
        }
    }
}

fn live_engine(config: &VixConfig) -> VixResult<VixEngine<YahooClient, FredClient>> {
    Ok(VixEngine::new(
        YahooClient::new()?,
        FredClient::from_env_or(config.fred.api_key.as_deref())?,
    ))
}

fn selected_composites<'a>(
    config: &'a VixConfig,
    label: Option<&str>,
) -> VixResult<Vec<&'a CompositeConfig>> {
    match label {
        Some(label) => config
            .composite(label)
            .map(|c| vec![c])
            .ok_or_else(|| VixError::config(format!("no composite labelled '{}'", label))),
        None if config.composites.is_empty() => {
            Err(VixError::config("no composites configured"))
        }
        None => Ok(config.composites.iter().collect()),
    }
}

fn single<O: OptionsProvider, Y: YieldCurveProvider>(
    engine: &VixEngine<O, Y>,
    ticker: &str,
) -> VixResult<()> {
    let result = engine.compute_single_name_vix(ticker)?;

    println!("{} VIX: {:.4}", result.ticker, result.value);
    if let Some(spot) = result.spot {
        println!("  Spot: {:.2}", spot);
    }
    for (name, tenor) in [("Near", &result.near), ("Next", &result.next)] {
        println!(
            "  {} term {}: T={:.5} R={:.3}% K*={:.2} F={:.2} K0={:.2} strikes={} var={:.6}",
            name,
            tenor.expiry,
            tenor.time_to_maturity,
            tenor.risk_free_rate * 100.0,
            tenor.forward_strike,
            tenor.forward,
            tenor.atm_strike,
            tenor.ladder.len(),
            tenor.variance
        );
    }
    Ok(())
}

fn composite<O: OptionsProvider, Y: YieldCurveProvider>(
    engine: &VixEngine<O, Y>,
    composites: &[&CompositeConfig],
) -> VixResult<()> {
    let mut any_ok = false;

    for config in composites {
        match engine.compute_composite_vix(&config.label, &config.tickers) {
            Ok(result) => {
                any_ok = true;
                println!(
                    "{}: {:.4} ({} of {} tickers)",
                    result.label,
                    result.value,
                    result.constituents.len(),
                    config.tickers.len()
                );
                for failure in &result.failures {
                    println!("  failed {}", failure);
                }
            }
            Err(VixError::AllTickersFailed { label, failures }) => {
                println!("{}: no value, every ticker failed", label);
                for failure in &failures {
                    println!("  failed {}", failure);
                }
            }
            Err(e) => println!("{}: {}", config.label, e),
        }
    }

    if any_ok {
        Ok(())
    } else {
        Err(VixError::data("no composite produced a value"))
    }
}

fn fetch(config: &VixConfig, tickers: &[String], output: &Path) -> VixResult<()> {
    if tickers.is_empty() {
        return Err(VixError::invalid_input("no tickers to fetch"));
    }

    let yahoo = YahooClient::new()?;
    let fred = FredClient::from_env_or(config.fred.api_key.as_deref())?;
    let snapshot = MarketSnapshot::record(&yahoo, &fred, tickers)?;
    snapshot.save(output)?;

    println!(
        "Recorded {} of {} tickers to {}",
        snapshot.tickers.len(),
        tickers.len(),
        output.display()
    );
    Ok(())
}
