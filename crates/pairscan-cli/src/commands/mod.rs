pub mod analyze;
pub mod pair;
pub mod stationarity;
pub mod synthetic;

use pairscan_core::{PriceMatrix, TimeSeries};

/// Look up one matrix column by symbol, with a listing of what is available
/// when the lookup fails.
pub fn series_by_symbol(
    matrix: &PriceMatrix,
    symbol: &str,
) -> Result<TimeSeries, Box<dyn std::error::Error>> {
    matrix
        .symbols()
        .iter()
        .position(|s| s == symbol)
        .and_then(|i| matrix.series(i))
        .ok_or_else(|| {
            format!(
                "Symbol '{}' not found — available: {}",
                symbol,
                matrix.symbols().join(", ")
            )
            .into()
        })
}
