//! Discrete placement configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights of the placement scoring terms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementWeights {
    /// Reward per occupied cell touching a candidate's perimeter.
    pub compactness: f64,
    /// Penalty per unit of mean weighted distance to placed neighbors.
    pub adjacency: f64,
    /// Penalty per corridor cell in the global layout score (0 disables).
    pub corridor: f64,
}

impl Default for PlacementWeights {
    fn default() -> Self {
        Self {
            compactness: 1.0,
            adjacency: 1.0,
            corridor: 0.0,
        }
    }
}

/// Acceptance rule of the iterated local search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Acceptance {
    /// Keep a perturbed layout only if it strictly improves the score.
    #[default]
    Strict,

    /// Metropolis criterion: a worse layout is accepted with probability
    /// `exp(delta / T)`, where `T` decays linearly from
    /// `initial_temperature` to 0 over the iteration budget. The best layout
    /// is tracked separately and is what the run returns.
    Metropolis {
        /// Starting temperature in score units.
        initial_temperature: f64,
    },
}

/// Configuration for the grid-based discrete placement solver.
///
/// # Examples
///
/// ```
/// use u_floorplan::discrete::{DiscreteConfig, Acceptance};
///
/// let config = DiscreteConfig::default()
///     .with_grid_resolution(0.5)
///     .with_max_iterations(200)
///     .with_acceptance(Acceptance::Metropolis { initial_temperature: 5.0 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscreteConfig {
    /// Length units per grid cell.
    pub grid_resolution: f64,

    /// Number of remove-and-replace iterations after greedy seeding.
    pub max_iterations: usize,

    /// Fraction of placed rooms removed per iteration (0.0–1.0).
    pub mutation_rate: f64,

    /// Scoring weights.
    pub weights: PlacementWeights,

    /// Acceptance rule for perturbed layouts.
    pub acceptance: Acceptance,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for DiscreteConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 1.0,
            max_iterations: 100,
            mutation_rate: 0.3,
            weights: PlacementWeights::default(),
            acceptance: Acceptance::Strict,
            seed: None,
        }
    }
}

impl DiscreteConfig {
    pub fn with_grid_resolution(mut self, resolution: f64) -> Self {
        self.grid_resolution = resolution;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_weights(mut self, weights: PlacementWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.grid_resolution.is_finite() || self.grid_resolution <= 0.0 {
            return Err(format!(
                "grid_resolution must be positive, got {}",
                self.grid_resolution
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        let w = self.weights;
        if [w.compactness, w.adjacency, w.corridor]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err("placement weights must be non-negative".into());
        }
        if let Acceptance::Metropolis { initial_temperature } = self.acceptance {
            if !initial_temperature.is_finite() || initial_temperature <= 0.0 {
                return Err(format!(
                    "metropolis initial_temperature must be positive, got {initial_temperature}"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscreteConfig::default();
        assert!((config.grid_resolution - 1.0).abs() < 1e-12);
        assert_eq!(config.max_iterations, 100);
        assert!((config.mutation_rate - 0.3).abs() < 1e-12);
        assert_eq!(config.acceptance, Acceptance::Strict);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_clamps_rate() {
        let config = DiscreteConfig::default().with_mutation_rate(1.7);
        assert!((config.mutation_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_resolution() {
        assert!(DiscreteConfig::default()
            .with_grid_resolution(0.0)
            .validate()
            .is_err());
        assert!(DiscreteConfig::default()
            .with_grid_resolution(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_negative_weight() {
        let config = DiscreteConfig::default().with_weights(PlacementWeights {
            compactness: -1.0,
            ..PlacementWeights::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_metropolis_temperature() {
        let bad = DiscreteConfig::default()
            .with_acceptance(Acceptance::Metropolis { initial_temperature: 0.0 });
        assert!(bad.validate().is_err());
        let ok = DiscreteConfig::default()
            .with_acceptance(Acceptance::Metropolis { initial_temperature: 2.0 });
        assert!(ok.validate().is_ok());
    }
}
