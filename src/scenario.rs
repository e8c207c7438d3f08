//! Drive a [TrainingState] against some [Scenario]: evaluate, record, check hooks, reproduce.

use crate::{
    error::{Error, Result},
    genome::Genome,
    network::Network,
    population::Population,
    state::{EpochStats, TrainingState},
};
use core::ops::ControlFlow;
use tracing::info;

pub trait Scenario: Sync {
    /// Number of (sensory, action) nodes a network needs to play this scenario
    fn io(&self) -> (usize, usize);

    /// Fitness of one network. Higher is better, and should not be negative.
    fn eval(&self, network: &mut Network) -> f64;
}

/// View of a run between evaluating a generation and reproducing it
pub struct Stats<'a> {
    pub generation: usize,
    pub population: &'a Population,
    pub history: &'a [EpochStats],
}

impl Stats<'_> {
    pub fn fittest(&self) -> Option<&Genome> {
        self.population.fittest()
    }

    pub fn any_fitter_than(&self, target: f64) -> bool {
        self.population.iter().any(|g| g.fitness >= target)
    }
}

pub type Hook = Box<dyn Fn(&Stats) -> ControlFlow<()>>;

#[derive(Default)]
pub struct EvolutionHooks {
    hooks: Vec<Hook>,
}

impl EvolutionHooks {
    pub fn new(hooks: Vec<Hook>) -> Self {
        Self { hooks }
    }

    pub fn push(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    /// Run every hook, breaking if any of them does
    pub fn fire(&self, stats: &Stats) -> ControlFlow<()> {
        let mut flow = ControlFlow::Continue(());
        for hook in self.hooks.iter() {
            if hook(stats).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        flow
    }
}

/// Stop once `generation` has been evaluated
pub fn until_generation(generation: usize) -> Hook {
    Box::new(move |stats: &Stats<'_>| {
        if stats.generation >= generation {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
}

/// Stop once any genome reaches `fitness`
pub fn until_fitness(fitness: f64) -> Hook {
    Box::new(move |stats: &Stats<'_>| {
        if stats.any_fitter_than(fitness) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
}

/// Assign every genome its fitness in `scenario`
#[cfg(not(feature = "parallel"))]
pub fn evaluate<S: Scenario>(scenario: &S, population: &mut Population) {
    for genome in population.iter_mut() {
        genome.fitness = scenario.eval(&mut genome.network());
    }
}

/// Assign every genome its fitness in `scenario`
#[cfg(feature = "parallel")]
pub fn evaluate<S: Scenario>(scenario: &S, population: &mut Population) {
    use rayon::prelude::*;

    let mut genomes = population.iter_mut().collect::<Vec<_>>();
    genomes
        .par_iter_mut()
        .for_each(|genome| genome.fitness = scenario.eval(&mut genome.network()));
}

/// Evolve until a hook breaks. Each generation is evaluated and recorded in the state's
/// history before hooks see it, so a stopped run leaves its final generation evaluated.
pub fn evolve<S: Scenario>(
    scenario: &S,
    state: &mut TrainingState,
    hooks: &EvolutionHooks,
) -> Result<()> {
    let (sensory, action) = scenario.io();
    let params = state.population.params();
    if (sensory, action) != (params.in_nodes, params.out_nodes) {
        return Err(Error::InvalidParameter {
            name: "in_nodes",
            reason: format!(
                "population is built for {} -> {} nodes, scenario wants {sensory} -> {action}",
                params.in_nodes, params.out_nodes
            ),
        });
    }

    loop {
        evaluate(scenario, &mut state.population);
        let recorded = state.record();
        info!(
            generation = recorded.epoch,
            max_fitness = recorded.max_fitness,
            average_fitness = recorded.average_fitness,
            species = state.population.species().len(),
            "evaluated generation"
        );

        let stats = Stats {
            generation: state.population.generation(),
            population: &state.population,
            history: &state.history,
        };
        if hooks.fire(&stats).is_break() {
            return Ok(());
        }

        state.population.epoch(&mut state.rng)?;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{params::Parameters, random::WyRng};
    use std::cell::Cell;

    struct Wiring;

    impl Scenario for Wiring {
        fn io(&self) -> (usize, usize) {
            (2, 1)
        }

        fn eval(&self, network: &mut Network) -> f64 {
            let out = network.forward(&[1., -1.], 1)[0];
            network.neurons().len() as f64 + out.abs()
        }
    }

    fn state(params: Parameters) -> TrainingState {
        let mut rng = WyRng::seeded(71);
        let population = Population::new(params, &mut rng).unwrap();
        TrainingState::new(population, rng)
    }

    fn params() -> Parameters {
        Parameters {
            population_size: 30,
            add_node_chance: 0.2,
            add_connection_chance: 0.5,
            generations_to_stagnate: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_until_generation() {
        let mut state = state(params());
        evolve(&Wiring, &mut state, &EvolutionHooks::new(vec![until_generation(5)])).unwrap();

        assert_eq!(state.population.generation(), 5);
        assert_eq!(state.history.len(), 6);
        assert_eq!(
            state.history.iter().map(|s| s.epoch).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5]
        );
        assert_eq!(state.population.len(), 30);
    }

    #[test]
    fn test_until_fitness() {
        let mut state = state(params());
        // every unconnected network has 3 nodes and outputs 1
        evolve(&Wiring, &mut state, &EvolutionHooks::new(vec![until_fitness(4.)])).unwrap();

        assert_eq!(state.history.len(), 1);
        assert!(state.population.iter().all(|g| g.fitness == 4.));
    }

    #[test]
    fn test_hooks_all_fire() {
        let seen = std::rc::Rc::new(Cell::new(0));
        let counter = seen.clone();
        let counting: Hook = Box::new(move |_: &Stats<'_>| {
            counter.set(counter.get() + 1);
            ControlFlow::Continue(())
        });
        let hooks = EvolutionHooks::new(vec![until_generation(0), counting]);

        let mut state = state(params());
        evolve(&Wiring, &mut state, &hooks).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_io_mismatch() {
        let mut state = state(Parameters {
            in_nodes: 3,
            ..params()
        });
        assert!(matches!(
            evolve(&Wiring, &mut state, &EvolutionHooks::default()),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(state.history.is_empty());
    }
}
