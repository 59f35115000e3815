use clap::Args;
use serde_json::{json, Value};

use pairscan_core::synthetic::{self, RandomWalkConfig};

use crate::output::csv_out;

/// Arguments for synthetic price-matrix generation
#[derive(Args)]
pub struct SyntheticArgs {
    /// Symbols to generate
    #[arg(long, value_delimiter = ',', default_value = "AAPL,MSFT,GOOGL,AMZN")]
    pub symbols: Vec<String>,

    /// Rows to generate
    #[arg(long, default_value_t = 2160)]
    pub observations: usize,

    /// Seed for the generator
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Price level of the first row
    #[arg(long, default_value_t = 100.0)]
    pub start_price: f64,

    /// Standard deviation of one price step
    #[arg(long, default_value_t = 1.0)]
    pub volatility: f64,

    /// Make the second symbol track the first with this hedge ratio
    /// (requires exactly two symbols)
    #[arg(long)]
    pub cointegrated: Option<f64>,

    /// Noise standard deviation for the tracking pair
    #[arg(long, default_value_t = 0.5)]
    pub noise: f64,

    /// Write the matrix as CSV to this path instead of emitting it
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run(args: SyntheticArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = RandomWalkConfig {
        observations: args.observations,
        start_price: args.start_price,
        volatility: args.volatility,
        ..RandomWalkConfig::default()
    };

    let matrix = match args.cointegrated {
        Some(hedge_ratio) => {
            if args.symbols.len() != 2 {
                return Err(format!(
                    "--cointegrated needs exactly two symbols, got {}",
                    args.symbols.len()
                )
                .into());
            }
            synthetic::cointegrated_pair_matrix(
                &args.symbols[0],
                &args.symbols[1],
                hedge_ratio,
                args.noise,
                &config,
                args.seed,
            )?
        }
        None => synthetic::random_walk_matrix(&args.symbols, &config, args.seed)?,
    };

    if let Some(path) = &args.out {
        csv_out::write_matrix_csv(path, &matrix)?;
        return Ok(json!({
            "written": path,
            "rows": matrix.num_rows(),
            "symbols": matrix.symbols(),
            "seed": args.seed,
        }));
    }

    Ok(serde_json::to_value(&matrix)?)
}
