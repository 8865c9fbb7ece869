mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lending_core::EngineConfig;
use serde_json::Value;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::AmortizeArgs;
use commands::placement::PreviewArgs;
use commands::portfolio::PortfolioArgs;
use commands::schedule::ScheduleArgs;
use commands::settlement::ClassifyArgs;

/// Loan amortization and payback schedule engine
#[derive(Parser)]
#[command(
    name = "lend",
    version,
    about = "Loan amortization and payback schedule engine",
    long_about = "A CLI for peer-to-peer lending calculations with decimal precision. \
                  Splits loans into per-period interest and principal, lays them on the \
                  payback calendar with tax and commission withheld, classifies settlement \
                  state and aggregates investor portfolios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (.json, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a loan into per-period interest and principal
    Amortize(AmortizeArgs),
    /// Generate an investor's payback schedule for a deal
    Schedule(ScheduleArgs),
    /// Classify the settlement state of one payback round
    Classify(ClassifyArgs),
    /// Aggregate an investor's portfolio
    Portfolio(PortfolioArgs),
    /// List an investor's investments, newest first
    History(PortfolioArgs),
    /// Preview payback of each offered investment amount
    Preview(PreviewArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lending_core=debug,lend=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the results
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, config),
        Commands::Classify(args) => commands::settlement::run_classify(args, config),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args, config),
        Commands::History(args) => commands::portfolio::run_history(args),
        Commands::Preview(args) => commands::placement::run_preview(args, config),
        Commands::Version => Ok(Value::String(format!("lend {}", env!("CARGO_PKG_VERSION")))),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Version => {
            println!("lend {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        command => input::file::load_config(cli.config.as_deref())
            .and_then(|config| run(command, &config)),
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
