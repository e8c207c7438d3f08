//! Everything needed to stop a training run and pick it up again later.

use crate::{error::Result, population::Population, random::WyRng};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Summary of one evaluated generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub max_fitness: f64,
    pub average_fitness: f64,
}

impl EpochStats {
    /// Summarize a population whose fitness has been assigned. An empty population scores 0.
    pub fn of(population: &Population) -> Self {
        let (count, sum, max) = population.iter().fold(
            (0usize, 0., f64::NEG_INFINITY),
            |(count, sum, max), g| (count + 1, sum + g.fitness, max.max(g.fitness)),
        );

        Self {
            epoch: population.generation(),
            max_fitness: if count == 0 { 0. } else { max },
            average_fitness: if count == 0 { 0. } else { sum / count as f64 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingState {
    pub population: Population,
    pub history: Vec<EpochStats>,
    pub rng: WyRng,
}

impl TrainingState {
    pub fn new(population: Population, rng: WyRng) -> Self {
        Self {
            population,
            history: vec![],
            rng,
        }
    }

    /// Record the stats of the current, evaluated generation
    pub fn record(&mut self) -> EpochStats {
        let stats = EpochStats::of(&self.population);
        self.history.push(stats);
        stats
    }

    /// Record the current generation, then advance to the next
    pub fn epoch(&mut self) -> Result<EpochStats> {
        let stats = self.record();
        self.population.epoch(&mut self.rng)?;
        Ok(stats)
    }

    pub fn to_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(s)?;
        state.population.params().validate()?;
        Ok(state)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string()?)?;
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_str(&fs::read_to_string(path)?)
    }
}
