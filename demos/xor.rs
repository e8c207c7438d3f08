use approx::relative_eq;
use core::ops::ControlFlow;
use flareon::{
    random::default_rng,
    scenario::{evolve, until_generation, EvolutionHooks},
    Hook, Network, Parameters, Population, Scenario, Stats, TrainingState,
};
use tracing::info;

const POPULATION: usize = 300;

struct Xor;

impl Scenario for Xor {
    // the third sensor is never fed, so it reads a constant 1 and acts as a bias
    fn io(&self) -> (usize, usize) {
        (3, 1)
    }

    fn eval(&self, network: &mut Network) -> f64 {
        [([0., 0.], 0.), ([1., 1.], 0.), ([1., 0.], 1.), ([0., 1.], 1.)]
            .iter()
            .map(|(pair, want)| {
                let v = network.forward(pair, 1)[0];
                1. - (want - v).powi(2).min(1.)
            })
            .sum()
    }
}

fn solved(stats: &Stats<'_>) -> ControlFlow<()> {
    if stats.generation % 25 == 0 {
        if let Some(fittest) = stats.fittest() {
            info!(
                generation = stats.generation,
                fitness = fittest.fitness,
                species = stats.population.species().len(),
                "progress"
            );
        }
    }

    let Some(fittest) = stats.fittest() else {
        return ControlFlow::Continue(());
    };

    let mut network = fittest.network();
    let correct = [([0., 0.], 0.), ([1., 1.], 0.), ([1., 0.], 1.), ([0., 1.], 1.)]
        .iter()
        .all(|(pair, want)| relative_eq!(network.forward(pair, 1)[0], *want, epsilon = 0.1));
    if correct {
        info!(generation = stats.generation, fitness = fittest.fitness, "xor solved");
        return ControlFlow::Break(());
    }

    ControlFlow::Continue(())
}

fn main() -> flareon::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let params = Parameters {
        population_size: POPULATION,
        in_nodes: 3,
        out_nodes: 1,
        ..Default::default()
    };
    let mut rng = default_rng();
    let population = Population::new(params, &mut rng)?;
    let mut state = TrainingState::new(population, rng);

    evolve(
        &Xor,
        &mut state,
        &EvolutionHooks::new(vec![Box::new(solved) as Hook, until_generation(1000)]),
    )?;

    if let Some(champ) = state.population.fittest() {
        println!("{}", champ.to_string()?);
    }
    state.to_file("xor-state.json")
}
