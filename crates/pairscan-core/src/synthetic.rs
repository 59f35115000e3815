//! Seeded synthetic price data for demos and statistical tests.
//!
//! Generators are deterministic functions of their configuration and an
//! explicit `u64` seed — reproducibility never depends on symbol-name
//! hashing or ambient process state.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::error::PairscanError;
use crate::types::PriceMatrix;
use crate::PairscanResult;

/// Shape of a generated random-walk price series.
#[derive(Debug, Clone)]
pub struct RandomWalkConfig {
    /// Number of rows to generate.
    pub observations: usize,
    /// Price level at the first observation.
    pub start_price: f64,
    /// Standard deviation of one price step.
    pub volatility: f64,
    /// Mean of one price step.
    pub drift: f64,
    /// Timestamp of the first observation.
    pub start: DateTime<Utc>,
    /// Spacing between observations.
    pub step: Duration,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            observations: 2160, // 90 days of hourly bars
            start_price: 100.0,
            volatility: 1.0,
            drift: 0.0,
            // 2024-01-01T00:00:00Z
            start: DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
            step: Duration::hours(1),
        }
    }
}

impl RandomWalkConfig {
    fn validate(&self) -> PairscanResult<()> {
        if self.observations < 2 {
            return Err(PairscanError::InvalidInput {
                field: "observations".into(),
                reason: format!("need at least 2, got {}", self.observations),
            });
        }
        if !self.start_price.is_finite() {
            return Err(PairscanError::InvalidInput {
                field: "start_price".into(),
                reason: "must be finite".into(),
            });
        }
        if !(self.volatility.is_finite() && self.volatility > 0.0) {
            return Err(PairscanError::InvalidInput {
                field: "volatility".into(),
                reason: format!("must be positive and finite, got {}", self.volatility),
            });
        }
        if !self.drift.is_finite() {
            return Err(PairscanError::InvalidInput {
                field: "drift".into(),
                reason: "must be finite".into(),
            });
        }
        if self.step <= Duration::zero() {
            return Err(PairscanError::InvalidInput {
                field: "step".into(),
                reason: "must be a positive duration".into(),
            });
        }
        Ok(())
    }

    fn index(&self) -> Vec<DateTime<Utc>> {
        (0..self.observations)
            .map(|i| self.start + self.step * i as i32)
            .collect()
    }
}

fn step_distribution(config: &RandomWalkConfig) -> PairscanResult<Normal> {
    Normal::new(config.drift, config.volatility).map_err(|e| PairscanError::InvalidInput {
        field: "volatility".into(),
        reason: format!("invalid step distribution: {e}"),
    })
}

fn walk(rng: &mut StdRng, steps: &Normal, config: &RandomWalkConfig) -> Vec<f64> {
    let mut level = config.start_price;
    (0..config.observations)
        .map(|_| {
            level += rng.sample(steps);
            level
        })
        .collect()
}

/// Generate one independent Gaussian random walk per symbol.
pub fn random_walk_matrix(
    symbols: &[String],
    config: &RandomWalkConfig,
    seed: u64,
) -> PairscanResult<PriceMatrix> {
    config.validate()?;
    if symbols.is_empty() {
        return Err(PairscanError::InvalidInput {
            field: "symbols".into(),
            reason: "at least one symbol is required".into(),
        });
    }

    let steps = step_distribution(config)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let columns: Vec<Vec<f64>> = symbols
        .iter()
        .map(|_| walk(&mut rng, &steps, config))
        .collect();

    PriceMatrix::new(config.index(), symbols.to_vec(), columns)
}

/// Generate a cointegrated pair: a random-walk base and a tracker
/// `B = hedge_ratio·A + noise` with stationary Gaussian noise.
pub fn cointegrated_pair_matrix(
    symbol_a: &str,
    symbol_b: &str,
    hedge_ratio: f64,
    noise_std: f64,
    config: &RandomWalkConfig,
    seed: u64,
) -> PairscanResult<PriceMatrix> {
    config.validate()?;
    if !hedge_ratio.is_finite() {
        return Err(PairscanError::InvalidInput {
            field: "hedge_ratio".into(),
            reason: "must be finite".into(),
        });
    }
    if !(noise_std.is_finite() && noise_std > 0.0) {
        return Err(PairscanError::InvalidInput {
            field: "noise_std".into(),
            reason: format!("must be positive and finite, got {}", noise_std),
        });
    }

    let steps = step_distribution(config)?;
    let noise = Normal::new(0.0, noise_std).map_err(|e| PairscanError::InvalidInput {
        field: "noise_std".into(),
        reason: format!("invalid noise distribution: {e}"),
    })?;

    let mut rng = StdRng::seed_from_u64(seed);
    let base = walk(&mut rng, &steps, config);
    let tracker: Vec<f64> = base
        .iter()
        .map(|a| hedge_ratio * a + rng.sample(noise))
        .collect();

    PriceMatrix::new(
        config.index(),
        vec![symbol_a.to_string(), symbol_b.to_string()],
        vec![base, tracker],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RandomWalkConfig {
        RandomWalkConfig {
            observations: 100,
            ..RandomWalkConfig::default()
        }
    }

    #[test]
    fn same_seed_reproduces_the_matrix() {
        let symbols = vec!["A".to_string(), "B".to_string()];
        let first = random_walk_matrix(&symbols, &small_config(), 42).unwrap();
        let second = random_walk_matrix(&symbols, &small_config(), 42).unwrap();

        for symbol in &symbols {
            assert_eq!(first.column(symbol).unwrap(), second.column(symbol).unwrap());
        }
        assert_eq!(first.timestamps(), second.timestamps());
    }

    #[test]
    fn different_seeds_differ() {
        let symbols = vec!["A".to_string()];
        let first = random_walk_matrix(&symbols, &small_config(), 1).unwrap();
        let second = random_walk_matrix(&symbols, &small_config(), 2).unwrap();
        assert_ne!(first.column("A").unwrap(), second.column("A").unwrap());
    }

    #[test]
    fn matrix_shape_matches_config() {
        let symbols: Vec<String> = (0..4).map(|i| format!("S{}", i)).collect();
        let matrix = random_walk_matrix(&symbols, &small_config(), 7).unwrap();
        assert_eq!(matrix.num_symbols(), 4);
        assert_eq!(matrix.num_rows(), 100);
        // Hourly index starting at the configured origin.
        let ts = matrix.timestamps();
        assert_eq!((ts[1] - ts[0]).num_hours(), 1);
    }

    #[test]
    fn rejects_degenerate_configs() {
        let symbols = vec!["A".to_string()];

        let mut config = small_config();
        config.observations = 1;
        assert!(random_walk_matrix(&symbols, &config, 0).is_err());

        let mut config = small_config();
        config.volatility = 0.0;
        assert!(random_walk_matrix(&symbols, &config, 0).is_err());

        let mut config = small_config();
        config.step = Duration::zero();
        assert!(random_walk_matrix(&symbols, &config, 0).is_err());

        assert!(random_walk_matrix(&[], &small_config(), 0).is_err());
    }

    #[test]
    fn tracker_stays_close_to_scaled_base() {
        let config = RandomWalkConfig {
            observations: 500,
            ..RandomWalkConfig::default()
        };
        let matrix = cointegrated_pair_matrix("A", "B", 0.8, 0.5, &config, 11).unwrap();
        let a = matrix.column("A").unwrap();
        let b = matrix.column("B").unwrap();

        // Residual noise has standard deviation ~0.5.
        let resid: Vec<f64> = a.iter().zip(b).map(|(x, y)| y - 0.8 * x).collect();
        let mean = resid.iter().sum::<f64>() / resid.len() as f64;
        let var = resid.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
            / (resid.len() - 1) as f64;
        assert!(var.sqrt() < 1.0, "residual std {} too large", var.sqrt());
        assert!(var.sqrt() > 0.2, "residual std {} too small", var.sqrt());
    }

    #[test]
    fn rejects_bad_noise_parameters() {
        assert!(cointegrated_pair_matrix("A", "B", 0.8, 0.0, &small_config(), 0).is_err());
        assert!(
            cointegrated_pair_matrix("A", "B", f64::NAN, 0.5, &small_config(), 0).is_err()
        );
    }
}
