pub mod file;
pub mod stdin;

use pairscan_core::PriceMatrix;

/// Resolve the price matrix from `--input`, falling back to piped JSON on
/// stdin.
pub fn resolve_matrix(
    path: &Option<String>,
) -> Result<PriceMatrix, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_price_matrix(path)
    } else if let Some(value) = stdin::read_stdin()? {
        Ok(serde_json::from_value(value)?)
    } else {
        Err("Provide --input <file> or pipe a JSON price matrix via stdin".into())
    }
}
