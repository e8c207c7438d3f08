//! A specie groups genomes that lie within the compatibility threshold of its representative.

use crate::{crossover::Coefficients, genome::Genome};
use rand::{seq::IndexedRandom, RngCore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specie {
    /// evaluated members of the current generation
    pub individuals: Vec<Genome>,
    /// members of the next generation, filled while an epoch reproduces
    pub offspring: Vec<Genome>,
    /// genome new members are compared against. A specie without one is pruned.
    pub repr: Option<Genome>,
    pub target_offspring: usize,
    pub fit_adjusted_total: f64,
    /// best fitness any member has reached
    pub fit_max: f64,
    /// generations since `fit_max` last improved
    pub stale: usize,
}

impl Specie {
    /// A specie founded by `genome`, which becomes its representative and first offspring
    pub fn founded_by(genome: Genome) -> Self {
        Self {
            repr: Some(genome.clone()),
            offspring: vec![genome],
            ..Default::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Whether `genome` is close enough to the representative to belong here
    pub fn admits(&self, genome: &Genome, coefficients: &Coefficients, threshold: f64) -> bool {
        self.repr
            .as_ref()
            .is_some_and(|repr| repr.delta(genome, coefficients) < threshold)
    }

    /// Track whether any member beat the best fitness seen so far, returning the updated
    /// stale count
    pub fn observe(&mut self) -> usize {
        let best = self
            .individuals
            .iter()
            .map(|g| g.fitness)
            .fold(f64::NEG_INFINITY, f64::max);

        if best > self.fit_max {
            self.fit_max = best;
            self.stale = 0;
        } else {
            self.stale += 1;
        }
        self.stale
    }

    /// Replace the current generation with the offspring, picking a new representative from
    /// among them. The new generation starts unevaluated.
    pub fn advance(&mut self, rng: &mut impl RngCore) {
        self.individuals = std::mem::take(&mut self.offspring);
        for genome in self.individuals.iter_mut() {
            genome.fitness = 0.;
        }
        self.repr = self.individuals.choose(rng).cloned();
        self.target_offspring = 0;
        self.fit_adjusted_total = 0.;
    }

    pub fn fittest(&self) -> Option<&Genome> {
        self.individuals
            .iter()
            .max_by(|l, r| l.fitness.total_cmp(&r.fitness))
    }
}
