use clap::Args;
use serde::Serialize;
use serde_json::Value;

use pairscan_core::synthetic::{self, RandomWalkConfig};
use pairscan_core::{
    CointegrationEngine, CointegrationResult, PairFailure, PriceMatrix, SummaryRow,
    DEFAULT_MIN_OBSERVATIONS, DEFAULT_SIGNIFICANCE_LEVEL,
};

use crate::input;

/// Arguments for the full pairwise scan
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a CSV/JSON/YAML price matrix
    #[arg(long)]
    pub input: Option<String>,

    /// Generate synthetic demo data instead of reading a file
    #[arg(long)]
    pub demo: bool,

    /// Symbols for demo data
    #[arg(long, value_delimiter = ',', default_value = "AAPL,MSFT,GOOGL,AMZN")]
    pub symbols: Vec<String>,

    /// Rows of demo data
    #[arg(long, default_value_t = 2160)]
    pub observations: usize,

    /// Seed for demo data
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// P-value threshold for cointegration
    #[arg(long, default_value_t = DEFAULT_SIGNIFICANCE_LEVEL)]
    pub significance: f64,

    /// Warn (without aborting) when the matrix has fewer rows than this
    #[arg(long, default_value_t = DEFAULT_MIN_OBSERVATIONS)]
    pub min_observations: usize,

    /// Include non-cointegrated pairs in the summary
    #[arg(long)]
    pub all: bool,

    /// Keep only the N most significant summary rows
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    summary: Vec<SummaryRow>,
    pairs_attempted: usize,
    pairs_tested: usize,
    cointegrated_count: usize,
    significance_level: f64,
    skipped: Vec<PairFailure>,
    warnings: Vec<String>,
}

pub fn run(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let matrix = load_matrix(&args)?;
    let engine = CointegrationEngine::new(args.significance)?;

    let analysis = engine.analyze_pairs(&matrix, args.min_observations);
    let skipped: Vec<PairFailure> = analysis.failures().cloned().collect();
    let warnings = analysis.warnings.clone();
    let pairs_attempted = analysis.attempted();
    let results: Vec<CointegrationResult> = analysis.into_results();

    let cointegrated_count = engine.filter_cointegrated(&results, None).len();
    let mut summary = engine.summarize(&results, args.all);
    if let Some(top) = args.top {
        summary.truncate(top);
    }

    let report = AnalyzeReport {
        summary,
        pairs_attempted,
        pairs_tested: results.len(),
        cointegrated_count,
        significance_level: engine.significance_level(),
        skipped,
        warnings,
    };
    Ok(serde_json::to_value(report)?)
}

fn load_matrix(args: &AnalyzeArgs) -> Result<PriceMatrix, Box<dyn std::error::Error>> {
    if args.demo {
        let config = RandomWalkConfig {
            observations: args.observations,
            ..RandomWalkConfig::default()
        };
        return Ok(synthetic::random_walk_matrix(&args.symbols, &config, args.seed)?);
    }
    input::resolve_matrix(&args.input)
}
