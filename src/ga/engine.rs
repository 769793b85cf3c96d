//! Evolution loop.
//!
//! Elitist generational GA: score, sort, carry elites, breed the rest
//! from a parent pool of the top ranks plus a random slice of the
//! remainder. The best individual ever seen is tracked separately, so a
//! late unlucky generation cannot lose the best schedule. Stagnation
//! raises the mutation rate to push the search out of local optima;
//! any improvement resets it.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//! Machine Learning"

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::capacity;
use crate::error::SolveError;
use crate::models::{
    AllowSet, CourseUnit, Individual, RoomTypeMap, ScheduleResult, SlotPool,
};

use super::crossover::crossover;
use super::fitness::FitnessEvaluator;
use super::init::initialize;
use super::mutation::mutate;
use super::repair::greedy_repair;
use super::GaConfig;

/// Generations without improvement before the mutation rate is boosted.
const STAGNATION_THRESHOLD: u32 = 3;

/// Multiplier applied to the mutation rate on each boost.
const STAGNATION_BOOST: f64 = 1.3;

/// Share of the sorted population admitted to the parent pool.
const PARENT_TOP_SHARE: f64 = 0.4;

/// Share of the remainder admitted at random, for diversity.
const PARENT_RANDOM_SHARE: f64 = 0.1;

/// The solver: owns a config, runs the full pipeline.
///
/// One `Engine` can run many problems; each [`run`](Engine::run) is
/// independent.
#[derive(Debug, Clone)]
pub struct Engine {
    config: GaConfig,
}

impl Engine {
    /// Creates an engine with the given configuration.
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs capacity preflight, initialization, evolution, and final
    /// repair, returning the best schedule found.
    ///
    /// `room_types` overrides the map otherwise derived from the pool's
    /// room-type column.
    pub fn run(
        &self,
        units: &[CourseUnit],
        pool: &SlotPool,
        room_types: Option<RoomTypeMap>,
        cancel: &CancellationToken,
    ) -> Result<ScheduleResult, SolveError> {
        self.config.validate().map_err(SolveError::InvalidConfig)?;

        let deficits = capacity::check(units, pool);
        if self.config.fail_on_deficit && !deficits.is_empty() {
            return Err(SolveError::Infeasible(deficits));
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let room_types = room_types.unwrap_or_else(|| RoomTypeMap::from_pool(pool));
        let allow = AllowSet::from_pool(pool);
        let evaluator = FitnessEvaluator::new(
            &allow,
            &room_types,
            &self.config.weights,
            self.config.full_coverage,
        );

        let mut population = initialize(
            units,
            pool,
            &room_types,
            self.config.population_size,
            seed,
            cancel,
        )?;
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut best_ever: Option<Individual> = None;
        let mut stagnation = 0u32;

        for generation in 0..self.config.generations {
            if cancel.is_cancelled() {
                return Err(SolveError::Cancelled);
            }

            self.score(&mut population, &evaluator);
            population.sort_by(|a, b| b.fitness.cmp(&a.fitness));

            let improved = best_ever
                .as_ref()
                .is_none_or(|b| population[0].fitness > b.fitness);
            if improved {
                best_ever = Some(population[0].clone());
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            if generation + 1 == self.config.generations {
                break;
            }

            let mutation_rate =
                effective_mutation_rate(self.config.mutation_rate, stagnation);
            if stagnation >= STAGNATION_THRESHOLD {
                log::debug!(
                    "generation {generation}: stagnant for {stagnation}, \
                     mutation rate {mutation_rate:.3}"
                );
            }

            population = self.breed(
                &population,
                pool,
                &allow,
                &room_types,
                mutation_rate,
                &mut rng,
                cancel,
            );
        }

        // best_ever is Some: generations >= 1 was validated.
        let winner = match best_ever {
            Some(b) if b.fitness >= population[0].fitness => b,
            _ => population.swap_remove(0),
        };
        let repaired = greedy_repair(&winner, pool, &allow, &room_types, &evaluator);
        Ok(ScheduleResult::from_individual(repaired))
    }

    fn score(&self, population: &mut [Individual], evaluator: &FitnessEvaluator<'_>) {
        let eval = |ind: &mut Individual| {
            if ind.fitness == Individual::UNEVALUATED {
                ind.fitness = evaluator.score(&ind.genes);
            }
        };
        if self.config.parallel {
            population.par_iter_mut().for_each(eval);
        } else {
            population.iter_mut().for_each(eval);
        }
    }

    /// Builds the next generation from a scored, descending-sorted
    /// population.
    #[allow(clippy::too_many_arguments)]
    fn breed(
        &self,
        population: &[Individual],
        pool: &SlotPool,
        allow: &AllowSet,
        room_types: &RoomTypeMap,
        mutation_rate: f64,
        rng: &mut SmallRng,
        cancel: &CancellationToken,
    ) -> Vec<Individual> {
        let parents = parent_pool(population, rng);
        let mut next = Vec::with_capacity(self.config.population_size);

        for elite in population.iter().take(self.config.elite_size) {
            next.push(elite.clone());
        }

        while next.len() < self.config.population_size {
            let a = pick(&parents, population, rng);
            let b = pick(&parents, population, rng);
            let child = if rng.random_bool(self.config.crossover_rate) {
                crossover(a, b, pool, allow, room_types, rng, cancel)
            } else {
                Individual::new(a.genes.clone())
            };
            next.push(mutate(
                &child,
                pool,
                allow,
                room_types,
                mutation_rate,
                rng,
                cancel,
            ));
        }
        next
    }
}

/// Mutation rate for one generation.
///
/// Stagnant generations past the threshold breed with the base rate
/// scaled by [`STAGNATION_BOOST`], capped at 1.0. The base rate is
/// never modified, so the boost does not compound across generations.
fn effective_mutation_rate(base: f64, stagnation: u32) -> f64 {
    if stagnation >= STAGNATION_THRESHOLD {
        (base * STAGNATION_BOOST).min(1.0)
    } else {
        base
    }
}

/// Indices eligible as parents: the top share plus a random slice of
/// the remainder.
fn parent_pool(population: &[Individual], rng: &mut SmallRng) -> Vec<usize> {
    let top = ((population.len() as f64 * PARENT_TOP_SHARE).ceil() as usize)
        .clamp(2.min(population.len()), population.len());
    let mut pool: Vec<usize> = (0..top).collect();

    let rest: Vec<usize> = (top..population.len()).collect();
    let extra = (rest.len() as f64 * PARENT_RANDOM_SHARE).ceil() as usize;
    pool.extend(rest.choose_multiple(rng, extra).copied());
    pool
}

fn pick<'a>(parents: &[usize], population: &'a [Individual], rng: &mut SmallRng) -> &'a Individual {
    match parents.choose(rng) {
        Some(&i) => &population[i],
        None => &population[0],
    }
}
