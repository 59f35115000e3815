//! The cointegration analysis engine and its derived statistics.

pub mod cointegration;
pub mod spread;
