//! Population management: reproduce, settle, evaluate, select, refill.

use super::config::{EvolveConfig, FreshBloodConfig, Reproduction};
use super::fitness::FitnessEvaluator;
use super::mutation::{crossover, mutate, randomize};
use super::squish::apply_squish_collisions;
use super::types::Gene;
use crate::random::SeededRng;
use rand::Rng;
use std::cmp::Ordering;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationStats {
    /// Generations completed, including this one.
    pub generation: usize,
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
}

/// A fixed-size population of genes, sorted best first.
#[derive(Debug, Clone)]
pub struct Population {
    genes: Vec<Gene>,
    config: EvolveConfig,
    rng: SeededRng,
    generation: usize,
}

fn by_fitness(a: &Gene, b: &Gene) -> Ordering {
    a.fitness().partial_cmp(&b.fitness()).unwrap_or(Ordering::Equal)
}

impl Population {
    /// Seeds the population from `initial`.
    ///
    /// The first gene is `initial` itself; the rest are mutated copies.
    /// Every gene is settled and scored before this returns.
    pub fn new(initial: Gene, config: EvolveConfig, evaluator: &FitnessEvaluator) -> Self {
        let mut rng = SeededRng::from_optional_seed(config.seed);
        let mut genes = Vec::with_capacity(config.population_size);
        genes.push(initial);
        while genes.len() < config.population_size {
            let mut gene = genes[0].clone();
            let count = mutation_count(&config, config.mutation_strength, &mut rng);
            mutate(
                &mut gene,
                &config.mutation_weights,
                count,
                evaluator.boundary(),
                config.aspect_reroll_probability,
                &mut rng,
            );
            genes.push(gene);
        }
        for gene in &mut genes {
            settle(gene, evaluator, config.physics_iterations, config.squish_margin);
        }
        evaluator.evaluate_all(&mut genes, config.parallel);
        genes.sort_by(by_fitness);

        Self {
            genes,
            config,
            rng,
            generation: 0,
        }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn config(&self) -> &EvolveConfig {
        &self.config
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn rng_state(&self) -> u64 {
        self.rng.state()
    }

    /// The best gene.
    pub fn best(&self) -> &Gene {
        &self.genes[0]
    }

    pub fn best_fitness(&self) -> f64 {
        self.genes[0].fitness()
    }

    pub fn worst_fitness(&self) -> f64 {
        self.genes.last().map_or(f64::INFINITY, |g| g.fitness())
    }

    /// Current summary without advancing.
    pub fn stats(&self) -> GenerationStats {
        let total: f64 = self.genes.iter().map(|g| g.fitness()).sum();
        let mean = total / self.genes.len() as f64;
        GenerationStats {
            generation: self.generation,
            best: self.best_fitness(),
            worst: self.worst_fitness(),
            mean,
        }
    }

    /// Mutation strength for the current generation.
    ///
    /// With annealing it decays linearly from the configured value to 0 at
    /// `max_generations`.
    pub fn current_strength(&self) -> f64 {
        let s0 = self.config.mutation_strength;
        if !self.config.annealing {
            return s0;
        }
        let progress = self.generation as f64 / self.config.max_generations as f64;
        s0 * (1.0 - progress).max(0.0)
    }

    /// Runs one generation.
    pub fn evolve(&mut self, evaluator: &FitnessEvaluator) -> GenerationStats {
        let strength = self.current_strength();
        let mut offspring = self.breed(evaluator, strength);
        evaluator.evaluate_all(&mut offspring, self.config.parallel);

        let mut pool = std::mem::take(&mut self.genes);
        pool.extend(offspring);
        pool.sort_by(by_fitness);
        self.genes = select(pool, self.config.population_size, self.config.survival_rate);

        self.generation += 1;
        if let Some(fresh) = self.config.fresh_blood {
            if self.generation % fresh.interval == 0 {
                self.inject_fresh_blood(&fresh, evaluator);
            }
        }

        let stats = self.stats();
        debug!(
            generation = stats.generation,
            best = stats.best,
            worst = stats.worst,
            strength,
            "generation complete"
        );
        stats
    }

    /// Reproduces one generation and settles it, without scoring.
    ///
    /// Offspring get `physics_iterations` resolution passes plus
    /// `physics_warmup` extra ones.
    fn breed(&mut self, evaluator: &FitnessEvaluator, strength: f64) -> Vec<Gene> {
        let passes = self.config.physics_iterations + self.config.physics_warmup.unwrap_or(0);
        let mut offspring = match self.config.reproduction {
            Reproduction::Mutation => self.mutated_offspring(evaluator, strength),
            Reproduction::Crossover => self.crossover_offspring(evaluator, strength),
        };
        for child in &mut offspring {
            settle(child, evaluator, passes, self.config.squish_margin);
        }
        offspring
    }

    fn mutated_offspring(&mut self, evaluator: &FitnessEvaluator, strength: f64) -> Vec<Gene> {
        let Self {
            genes, config, rng, ..
        } = self;
        genes
            .iter()
            .map(|parent| {
                let mut child = parent.clone();
                let count = mutation_count(config, strength, rng);
                mutate(
                    &mut child,
                    &config.mutation_weights,
                    count,
                    evaluator.boundary(),
                    config.aspect_reroll_probability,
                    rng,
                );
                child.invalidate();
                child
            })
            .collect()
    }

    fn crossover_offspring(&mut self, evaluator: &FitnessEvaluator, strength: f64) -> Vec<Gene> {
        let Self {
            genes, config, rng, ..
        } = self;
        let elite = (genes.len() / 2).max(1);
        (0..config.population_size)
            .map(|_| {
                let a = &genes[rng.random_range(0..elite)];
                let b = &genes[rng.random_range(0..elite)];
                let mut child = crossover(a, b, rng);
                if rng.random_bool(config.mutation_rate.clamp(0.0, 1.0)) {
                    let count = mutation_count(config, strength, rng);
                    mutate(
                        &mut child,
                        &config.mutation_weights,
                        count,
                        evaluator.boundary(),
                        config.aspect_reroll_probability,
                        rng,
                    );
                }
                child
            })
            .collect()
    }

    /// Replaces the worst genes with randomized, incubated newcomers.
    ///
    /// The best gene is never replaced.
    fn inject_fresh_blood(&mut self, fresh: &FreshBloodConfig, evaluator: &FitnessEvaluator) {
        let pop = self.genes.len();
        let count = ((pop as f64 * fresh.replace_fraction).floor() as usize).min(pop - 1);
        if count == 0 {
            return;
        }

        let passes = self.config.physics_iterations.max(1);
        for slot in (pop - count..pop).rev() {
            let mut newcomer = self.genes[0].clone();
            randomize(&mut newcomer, evaluator.boundary(), &mut self.rng);
            settle(&mut newcomer, evaluator, passes, self.config.squish_margin);
            evaluator.evaluate(&mut newcomer);

            let before = newcomer.fitness();
            for _ in 0..fresh.incubation_rounds {
                let mut candidate = newcomer.clone();
                mutate(
                    &mut candidate,
                    &fresh.incubation_weights,
                    self.config.max_mutations.max(1),
                    evaluator.boundary(),
                    self.config.aspect_reroll_probability,
                    &mut self.rng,
                );
                settle(&mut candidate, evaluator, passes * 2, self.config.squish_margin);
                evaluator.evaluate(&mut candidate);
                if candidate.fitness() <= newcomer.fitness() {
                    newcomer = candidate;
                }
            }
            trace!(
                slot,
                before,
                after = newcomer.fitness(),
                "fresh blood admitted"
            );
            self.genes[slot] = newcomer;
        }
        self.genes.sort_by(by_fitness);
    }
}

/// Mutations for one offspring: `round(uniform[1, max_mutations] * strength)`,
/// at least 1 while `strength` is positive.
fn mutation_count<R: Rng>(config: &EvolveConfig, strength: f64, rng: &mut R) -> usize {
    if config.max_mutations == 0 || strength <= 0.0 {
        return 0;
    }
    let drawn = rng.random_range(1..=config.max_mutations) as f64;
    ((drawn * strength).round() as usize).max(1)
}

/// Resolves collisions, clamps into the boundary box, and marks the gene
/// for re-evaluation.
fn settle(gene: &mut Gene, evaluator: &FitnessEvaluator, passes: usize, margin: f64) {
    apply_squish_collisions(gene.rooms_mut(), evaluator.boundary(), passes, margin);
    gene.invalidate();
}

/// Keeps the best `ceil(len * survival_rate)` genes of a sorted pool and
/// refills to `size` by cloning survivors round-robin.
fn select(mut pool: Vec<Gene>, size: usize, survival_rate: f64) -> Vec<Gene> {
    let keep = ((pool.len() as f64 * survival_rate).ceil() as usize).clamp(1, size);
    pool.truncate(keep);
    let mut next = 0;
    while pool.len() < size {
        pool.push(pool[next % keep].clone());
        next += 1;
    }
    pool
}
