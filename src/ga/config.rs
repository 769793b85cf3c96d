//! Run configuration and scoring weights.
//!
//! [`GaConfig`] holds every parameter of the evolutionary loop;
//! [`FitnessWeights`] is the single immutable weight table consulted by
//! the evaluator — no scattered constants.

use serde::{Deserialize, Serialize};

/// Penalty and reward weights for the fitness evaluator.
///
/// All weights are positive magnitudes; the evaluator subtracts
/// penalties and adds rewards. Defaults follow the production tuning:
/// hard conflicts dominate, soft quality terms nudge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Teacher double-booked on one (day, start, stop).
    pub teacher_overlap: i64,
    /// Student group double-booked.
    pub group_overlap: i64,
    /// Room double-booked.
    pub room_overlap: i64,
    /// Placement outside the permission set, or group type unresolved.
    pub out_of_allow: i64,
    /// Placed room's type differs from the required room type.
    pub room_type_mismatch: i64,
    /// Gene has `start >= stop`.
    pub invalid_time: i64,
    /// Gene carries no placement.
    pub unassigned: i64,
    /// Legally placed, room-type-fit gene.
    pub valid_reward: i64,
    /// Lab hour scheduled before the course's first theory hour.
    pub lab_before_theory: i64,
    /// Back-to-back same-course same-day pair.
    pub contiguity_bonus: i64,
    /// Same-day gap between same-course hours, per whole hour of gap.
    pub gap_penalty: i64,
    /// Each disjoint same-day run beyond the first.
    pub segment_penalty: i64,
    /// Per unassigned gene in full-coverage mode, on top of `unassigned`.
    pub missing_unit_penalty: i64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            teacher_overlap: 800,
            group_overlap: 800,
            room_overlap: 800,
            out_of_allow: 400,
            room_type_mismatch: 250,
            invalid_time: 200,
            unassigned: 300,
            valid_reward: 20,
            lab_before_theory: 150,
            contiguity_bonus: 5,
            gap_penalty: 15,
            segment_penalty: 25,
            missing_unit_penalty: 1000,
        }
    }
}

/// Configuration for one solver run.
///
/// # Builder Pattern
///
/// ```
/// use timetable_solver::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_generations(200)
///     .with_seed(42);
/// assert_eq!(config.population_size, 80);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of generations to evolve.
    pub generations: usize,
    /// Top individuals copied unchanged into the next generation.
    pub elite_size: usize,
    /// Probability a child is produced by crossover rather than cloning.
    pub crossover_rate: f64,
    /// Base per-gene mutation probability.
    pub mutation_rate: f64,
    /// Random seed. `None` draws one from OS entropy, so repeated runs
    /// differ by default; `Some` makes the run reproducible.
    pub seed: Option<u64>,
    /// Evaluate fitness across worker threads within a generation.
    pub parallel: bool,
    /// Promote capacity deficits to a hard failure before the search.
    pub fail_on_deficit: bool,
    /// Add a large per-gene penalty for every hour left unassigned.
    pub full_coverage: bool,
    /// Scoring weight table.
    pub weights: FitnessWeights,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            elite_size: 3,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            seed: None,
            parallel: true,
            fail_on_deficit: false,
            full_coverage: false,
            weights: FitnessWeights::default(),
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the base mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Promotes capacity deficits to a hard failure.
    pub fn with_fail_on_deficit(mut self, fail: bool) -> Self {
        self.fail_on_deficit = fail;
        self
    }

    /// Enables full-coverage scoring.
    pub fn with_full_coverage(mut self, full: bool) -> Self {
        self.full_coverage = full;
        self
    }

    /// Sets the weight table.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if self.elite_size >= self.population_size {
            return Err("elite_size too high: elites fill entire population".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within 0.0..=1.0".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within 0.0..=1.0".into());
        }
        Ok(())
    }
}
