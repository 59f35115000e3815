use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};

use pairscan_core::{
    CointegrationEngine, CointegrationResult, PairscanError, DEFAULT_SIGNIFICANCE_LEVEL,
};

use crate::commands::series_by_symbol;
use crate::input;

/// Arguments for a single Engle-Granger pair test
#[derive(Args)]
pub struct TestPairArgs {
    /// Path to a CSV/JSON/YAML price matrix
    #[arg(long)]
    pub input: Option<String>,

    /// First symbol (regressand)
    #[arg(long)]
    pub symbol_a: String,

    /// Second symbol (regressor)
    #[arg(long)]
    pub symbol_b: String,

    /// P-value threshold for cointegration
    #[arg(long, default_value_t = DEFAULT_SIGNIFICANCE_LEVEL)]
    pub significance: f64,
}

#[derive(Debug, Serialize)]
struct PairReport {
    result: CointegrationResult,
    spread_statistics: Value,
}

pub fn run(args: TestPairArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let matrix = input::resolve_matrix(&args.input)?;
    let series_a = series_by_symbol(&matrix, &args.symbol_a)?;
    let series_b = series_by_symbol(&matrix, &args.symbol_b)?;

    let engine = CointegrationEngine::new(args.significance)?;
    let result = engine.test_pair(&series_a, &series_b)?;

    // A degenerate spread (zero variance) has no z-score; report why
    // instead of failing the whole command.
    let spread_statistics = match engine.spread_statistics(&result) {
        Ok(stats) => serde_json::to_value(stats)?,
        Err(PairscanError::UndefinedStatistic(reason)) => json!({ "undefined": reason }),
        Err(e) => return Err(e.into()),
    };

    let report = PairReport {
        result,
        spread_statistics,
    };
    Ok(serde_json::to_value(report)?)
}
