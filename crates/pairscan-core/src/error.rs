use thiserror::Error;

#[derive(Debug, Error)]
pub enum PairscanError {
    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),

    #[error("Numerical failure in {context}")]
    Numerical { context: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PairscanError {
    fn from(e: serde_json::Error) -> Self {
        PairscanError::Serialization(e.to_string())
    }
}
