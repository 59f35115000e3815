use clap::Args;
use serde_json::{json, Value};

use pairscan_core::{CointegrationEngine, DEFAULT_SIGNIFICANCE_LEVEL};

use crate::commands::series_by_symbol;
use crate::input;

/// Arguments for a single-series stationarity test
#[derive(Args)]
pub struct StationarityArgs {
    /// Path to a CSV/JSON/YAML price matrix
    #[arg(long)]
    pub input: Option<String>,

    /// Symbol to test
    #[arg(long)]
    pub symbol: String,

    /// P-value threshold for stationarity
    #[arg(long, default_value_t = DEFAULT_SIGNIFICANCE_LEVEL)]
    pub significance: f64,
}

pub fn run(args: StationarityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let matrix = input::resolve_matrix(&args.input)?;
    let series = series_by_symbol(&matrix, &args.symbol)?;

    let engine = CointegrationEngine::new(args.significance)?;
    let result = engine.test_stationarity(&series)?;

    Ok(json!({ "result": result }))
}
