mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::pair::TestPairArgs;
use commands::stationarity::StationarityArgs;
use commands::synthetic::SyntheticArgs;

/// Cointegration screening for pairs-trading universes
#[derive(Parser)]
#[command(
    name = "pairscan",
    version,
    about = "Cointegration screening for pairs-trading universes",
    long_about = "Scans a universe of price series for cointegrated pairs using the \
                  Engle-Granger two-step test: hedge ratios via OLS, unit-root tests \
                  on the spread, and MacKinnon p-values. Reads CSV/JSON/YAML price \
                  matrices or generates seeded synthetic data."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Test every symbol pair in a price matrix for cointegration
    Analyze(AnalyzeArgs),
    /// Run the Engle-Granger test on a single pair
    TestPair(TestPairArgs),
    /// Augmented Dickey-Fuller stationarity test on one column
    Stationarity(StationarityArgs),
    /// Generate a seeded synthetic price matrix
    Synthetic(SyntheticArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::TestPair(args) => commands::pair::run(args),
        Commands::Stationarity(args) => commands::stationarity::run(args),
        Commands::Synthetic(args) => commands::synthetic::run(args),
        Commands::Version => {
            println!("pairscan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
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
