//! Continuous refinement configuration.
//!
//! [`EvolveConfig`] holds every parameter of the population loop;
//! [`FitnessConfig`] selects and weights the fitness model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative weights of the four mutation operators.
///
/// All-zero weights disable mutation entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MutationWeights {
    /// Move one room to a random interior position.
    pub teleport: f64,
    /// Cyclically exchange the positions of 2–4 rooms.
    pub swap: f64,
    /// Rotate every room center around the layout centroid.
    pub rotate: f64,
    /// Re-roll one room's aspect ratio in place.
    pub reshape: f64,
}

impl MutationWeights {
    pub fn as_array(&self) -> [f64; 4] {
        [self.teleport, self.swap, self.rotate, self.reshape]
    }

    /// Weights with every operator disabled.
    pub fn none() -> Self {
        Self {
            teleport: 0.0,
            swap: 0.0,
            rotate: 0.0,
            reshape: 0.0,
        }
    }
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            teleport: 1.0,
            swap: 1.0,
            rotate: 0.25,
            reshape: 1.0,
        }
    }
}

/// How offspring are produced each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Reproduction {
    /// Every gene is cloned and mutated.
    #[default]
    Mutation,
    /// Children recombine two parents from the top half, then mutate with
    /// probability `mutation_rate`.
    Crossover,
}

/// Adjacency term of the fitness function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdjacencyModel {
    /// Weighted center-to-center distance, blended against the geometric
    /// term by `balance` (0 = geometry only, 1 = adjacency only).
    CenterDistance { balance: f64 },

    /// Squared deficit of shared wall length below `target_length`. Rooms
    /// that do not touch pay more than any touching pair, growing with
    /// their separation. Edges within `tolerance` count as collinear.
    SharedWall { target_length: f64, tolerance: f64 },
}

impl Default for AdjacencyModel {
    fn default() -> Self {
        AdjacencyModel::SharedWall {
            target_length: 2.0,
            tolerance: 0.1,
        }
    }
}

/// How area deviation is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AreaDeviation {
    #[default]
    Absolute,
    Squared,
}

/// Per-component fitness weights.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessWeights {
    pub geometric: f64,
    pub adjacency: f64,
    pub area: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            geometric: 1.0,
            adjacency: 1.0,
            area: 1.0,
        }
    }
}

/// Fitness model configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessConfig {
    pub adjacency_model: AdjacencyModel,

    /// When set, each pairwise overlap area is raised to this power
    /// (values above 1 punish large overlaps super-linearly).
    pub overlap_exponent: Option<f64>,

    /// Multiplier on out-of-boundary area inside the geometric term.
    pub out_of_bounds_factor: f64,

    pub area_deviation: AreaDeviation,

    pub weights: FitnessWeights,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            adjacency_model: AdjacencyModel::default(),
            overlap_exponent: None,
            out_of_bounds_factor: 100.0,
            area_deviation: AreaDeviation::Absolute,
            weights: FitnessWeights::default(),
        }
    }
}

impl FitnessConfig {
    /// Validates the fitness configuration.
    pub fn validate(&self) -> Result<(), String> {
        let w = self.weights;
        if [w.geometric, w.adjacency, w.area, self.out_of_bounds_factor]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err("fitness weights must be non-negative".into());
        }
        if let Some(e) = self.overlap_exponent {
            if !e.is_finite() || e <= 0.0 {
                return Err(format!("overlap_exponent must be positive, got {e}"));
            }
        }
        match self.adjacency_model {
            AdjacencyModel::CenterDistance { balance } => {
                if !(0.0..=1.0).contains(&balance) {
                    return Err(format!("fitness balance must be in [0, 1], got {balance}"));
                }
            }
            AdjacencyModel::SharedWall {
                target_length,
                tolerance,
            } => {
                if !target_length.is_finite() || target_length < 0.0 {
                    return Err("shared wall target_length must be non-negative".into());
                }
                if !tolerance.is_finite() || tolerance < 0.0 {
                    return Err("shared wall tolerance must be non-negative".into());
                }
            }
        }
        Ok(())
    }
}

/// Periodic replacement of the worst genes with incubated newcomers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreshBloodConfig {
    /// Inject every `interval` generations.
    pub interval: usize,

    /// Fraction of the population replaced (the worst ones).
    pub replace_fraction: f64,

    /// Mutate-and-settle rounds a newcomer runs before admission.
    pub incubation_rounds: usize,

    /// Operator weights used during incubation.
    pub incubation_weights: MutationWeights,
}

impl Default for FreshBloodConfig {
    fn default() -> Self {
        Self {
            interval: 10,
            replace_fraction: 0.25,
            incubation_rounds: 20,
            incubation_weights: MutationWeights {
                teleport: 1.0,
                swap: 3.0,
                rotate: 0.5,
                reshape: 3.0,
            },
        }
    }
}

/// Configuration for the evolutionary refinement engine.
///
/// # Defaults
///
/// ```
/// use u_floorplan::evolve::EvolveConfig;
///
/// let config = EvolveConfig::default();
/// assert_eq!(config.population_size, 30);
/// assert_eq!(config.max_generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_floorplan::evolve::{EvolveConfig, FreshBloodConfig, Reproduction};
///
/// let config = EvolveConfig::default()
///     .with_population_size(40)
///     .with_reproduction(Reproduction::Crossover)
///     .with_annealing(true)
///     .with_fresh_blood(FreshBloodConfig::default())
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvolveConfig {
    /// Number of genes kept between generations.
    pub population_size: usize,

    /// Generation budget; `step` is a no-op once reached.
    pub max_generations: usize,

    /// Fraction of the expanded pool kept as survivors (0.0–1.0].
    pub survival_rate: f64,

    /// Offspring production strategy.
    pub reproduction: Reproduction,

    /// Upper bound of mutations applied to one offspring.
    pub max_mutations: usize,

    /// Scales the number of mutations per offspring (0 disables).
    pub mutation_strength: f64,

    /// Probability that a crossover child is mutated.
    pub mutation_rate: f64,

    /// Probability that teleport also re-rolls the room's aspect ratio.
    pub aspect_reroll_probability: f64,

    pub mutation_weights: MutationWeights,

    /// Collision resolution passes per offspring.
    pub physics_iterations: usize,

    /// Gap left between rooms separated by collision resolution.
    pub squish_margin: f64,

    pub fitness: FitnessConfig,

    /// Linearly decay `mutation_strength` to 0 over `max_generations`.
    ///
    /// Strength scales the mutation count per offspring, floored at one
    /// mutation while it stays positive, so annealing reduces how many
    /// operators an offspring gets but never breeds unmutated clones
    /// before strength reaches 0.
    pub annealing: bool,

    /// Extra resolution passes on offspring before scoring.
    pub physics_warmup: Option<usize>,

    pub fresh_blood: Option<FreshBloodConfig>,

    /// Evaluate fitness in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_generations: 200,
            survival_rate: 0.5,
            reproduction: Reproduction::Mutation,
            max_mutations: 3,
            mutation_strength: 1.0,
            mutation_rate: 0.8,
            aspect_reroll_probability: 0.5,
            mutation_weights: MutationWeights::default(),
            physics_iterations: 3,
            squish_margin: 0.05,
            fitness: FitnessConfig::default(),
            annealing: false,
            physics_warmup: None,
            fresh_blood: None,
            parallel: false,
            seed: None,
        }
    }
}

impl EvolveConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_survival_rate(mut self, rate: f64) -> Self {
        self.survival_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_reproduction(mut self, reproduction: Reproduction) -> Self {
        self.reproduction = reproduction;
        self
    }

    pub fn with_max_mutations(mut self, n: usize) -> Self {
        self.max_mutations = n;
        self
    }

    pub fn with_mutation_strength(mut self, strength: f64) -> Self {
        self.mutation_strength = strength.max(0.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_weights(mut self, weights: MutationWeights) -> Self {
        self.mutation_weights = weights;
        self
    }

    pub fn with_physics_iterations(mut self, n: usize) -> Self {
        self.physics_iterations = n;
        self
    }

    pub fn with_fitness(mut self, fitness: FitnessConfig) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn with_annealing(mut self, enabled: bool) -> Self {
        self.annealing = enabled;
        self
    }

    pub fn with_physics_warmup(mut self, passes: usize) -> Self {
        self.physics_warmup = Some(passes);
        self
    }

    pub fn with_fresh_blood(mut self, fresh_blood: FreshBloodConfig) -> Self {
        self.fresh_blood = Some(fresh_blood);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick previews.
    ///
    /// - Population: 16, Generations: 60, no fresh blood
    pub fn fast() -> Self {
        Self {
            population_size: 16,
            max_generations: 60,
            physics_iterations: 2,
            ..Self::default()
        }
    }

    /// Preset balancing quality and time.
    ///
    /// - Population: 30, Generations: 200, annealing, fresh blood every 10
    pub fn balanced() -> Self {
        Self {
            annealing: true,
            physics_warmup: Some(2),
            fresh_blood: Some(FreshBloodConfig::default()),
            ..Self::default()
        }
    }

    /// Preset for final layouts.
    ///
    /// - Population: 60, Generations: 500, annealing, warm-up, fresh blood every 15
    pub fn quality() -> Self {
        Self {
            population_size: 60,
            max_generations: 500,
            physics_iterations: 4,
            annealing: true,
            physics_warmup: Some(4),
            fresh_blood: Some(FreshBloodConfig {
                interval: 15,
                incubation_rounds: 40,
                ..FreshBloodConfig::default()
            }),
            ..Self::default()
        }
    }

    /// Picks a preset by room count.
    ///
    /// - `room_count < 6` → [`fast()`](Self::fast)
    /// - `6 ≤ room_count < 15` → [`balanced()`](Self::balanced)
    /// - `room_count ≥ 15` → [`quality()`](Self::quality)
    pub fn auto_select(room_count: usize) -> Self {
        if room_count < 6 {
            Self::fast()
        } else if room_count < 15 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if !(self.survival_rate > 0.0 && self.survival_rate <= 1.0) {
            return Err(format!(
                "survival_rate must be in (0, 1], got {}",
                self.survival_rate
            ));
        }
        if !self.mutation_strength.is_finite() || self.mutation_strength < 0.0 {
            return Err("mutation_strength must be non-negative".into());
        }
        for (name, p) in [
            ("mutation_rate", self.mutation_rate),
            ("aspect_reroll_probability", self.aspect_reroll_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        if self
            .mutation_weights
            .as_array()
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err("mutation weights must be non-negative".into());
        }
        if !self.squish_margin.is_finite() || self.squish_margin < 0.0 {
            return Err("squish_margin must be non-negative".into());
        }
        if let Some(fb) = &self.fresh_blood {
            if fb.interval == 0 {
                return Err("fresh_blood interval must be at least 1".into());
            }
            if !(0.0..1.0).contains(&fb.replace_fraction) {
                return Err(format!(
                    "fresh_blood replace_fraction must be in [0, 1), got {}",
                    fb.replace_fraction
                ));
            }
            if fb
                .incubation_weights
                .as_array()
                .iter()
                .any(|w| !w.is_finite() || *w < 0.0)
            {
                return Err("incubation weights must be non-negative".into());
            }
        }
        self.fitness.validate()
    }
}
