//! Evolution parameters, loadable from and storable to JSON.

use crate::{
    constants::*,
    crossover::Coefficients,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub population_size: usize,
    pub elite_count: usize,
    pub elite_copies: usize,
    pub in_nodes: usize,
    pub out_nodes: usize,
    pub crossover_disable_connection_chance: f64,
    pub add_connection_chance: f64,
    pub add_node_chance: f64,
    pub mutate_weights_chance: f64,
    pub perturb_weight_chance: f64,
    pub max_weight_perturbation: f64,
    pub previous_gen_mutate_percentage: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub n: f64,
    pub compatibility_threshold: f64,
    pub interspecies_mating_rate: f64,
    pub generations_to_stagnate: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            population_size: FLAREON_POPULATION_SIZE,
            elite_count: FLAREON_ELITE_COUNT,
            elite_copies: FLAREON_ELITE_COPIES,
            in_nodes: FLAREON_IN_NODES,
            out_nodes: FLAREON_OUT_NODES,
            crossover_disable_connection_chance: FLAREON_CROSSOVER_DISABLE_CONNECTION_CHANCE,
            add_connection_chance: FLAREON_ADD_CONNECTION_CHANCE,
            add_node_chance: FLAREON_ADD_NODE_CHANCE,
            mutate_weights_chance: FLAREON_MUTATE_WEIGHTS_CHANCE,
            perturb_weight_chance: FLAREON_PERTURB_WEIGHT_CHANCE,
            max_weight_perturbation: FLAREON_MAX_WEIGHT_PERTURBATION,
            previous_gen_mutate_percentage: FLAREON_PREVIOUS_GEN_MUTATE_PERCENTAGE,
            c1: FLAREON_EXCESS_COEFFICIENT,
            c2: FLAREON_DISJOINT_COEFFICIENT,
            c3: FLAREON_WEIGHT_COEFFICIENT,
            n: FLAREON_NORMALIZATION,
            compatibility_threshold: FLAREON_COMPATIBILITY_THRESHOLD,
            interspecies_mating_rate: FLAREON_INTERSPECIES_MATING_RATE,
            generations_to_stagnate: FLAREON_GENERATIONS_TO_STAGNATE,
        }
    }
}

fn positive(name: &'static str, v: usize) -> Result<()> {
    if v == 0 {
        return Err(Error::InvalidParameter {
            name,
            reason: "must be greater than 0".into(),
        });
    }
    Ok(())
}

fn chance(name: &'static str, v: f64) -> Result<()> {
    if !(0. ..=1.).contains(&v) {
        return Err(Error::InvalidParameter {
            name,
            reason: format!("{v} is not within [0, 1]"),
        });
    }
    Ok(())
}

fn finite(name: &'static str, v: f64) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::InvalidParameter {
            name,
            reason: format!("{v} is not finite"),
        });
    }
    Ok(())
}

impl Parameters {
    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<()> {
        positive("population_size", self.population_size)?;
        positive("in_nodes", self.in_nodes)?;
        positive("out_nodes", self.out_nodes)?;
        positive("generations_to_stagnate", self.generations_to_stagnate)?;

        chance(
            "crossover_disable_connection_chance",
            self.crossover_disable_connection_chance,
        )?;
        chance("add_connection_chance", self.add_connection_chance)?;
        chance("add_node_chance", self.add_node_chance)?;
        chance("mutate_weights_chance", self.mutate_weights_chance)?;
        chance("perturb_weight_chance", self.perturb_weight_chance)?;
        chance(
            "previous_gen_mutate_percentage",
            self.previous_gen_mutate_percentage,
        )?;
        chance("interspecies_mating_rate", self.interspecies_mating_rate)?;

        finite("max_weight_perturbation", self.max_weight_perturbation)?;
        if self.max_weight_perturbation < 0. {
            return Err(Error::InvalidParameter {
                name: "max_weight_perturbation",
                reason: "must not be negative".into(),
            });
        }

        finite("c1", self.c1)?;
        finite("c2", self.c2)?;
        finite("c3", self.c3)?;
        finite("n", self.n)?;
        if self.n <= 0. {
            return Err(Error::InvalidParameter {
                name: "n",
                reason: "must be greater than 0".into(),
            });
        }

        finite("compatibility_threshold", self.compatibility_threshold)?;
        if self.compatibility_threshold <= 0. {
            return Err(Error::InvalidParameter {
                name: "compatibility_threshold",
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }

    #[inline]
    pub fn coefficients(&self) -> Coefficients {
        Coefficients {
            c1: self.c1,
            c2: self.c2,
            c3: self.c3,
            n: self.n,
        }
    }

    pub fn to_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string()?)?;
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_str(&fs::read_to_string(path)?)
    }
}
