use criterion::{BatchSize, Criterion};
use flareon::{Parameters, Population, WyRng};

fn evaluated(rng: &mut WyRng, generations: usize) -> Population {
    let params = Parameters {
        add_connection_chance: 0.3,
        add_node_chance: 0.1,
        generations_to_stagnate: usize::MAX,
        ..Default::default()
    };
    let mut population = Population::new(params, rng).unwrap();
    for _ in 0..=generations {
        for genome in population.iter_mut() {
            genome.fitness = genome.connections.len() as f64;
        }
        if population.generation() < generations {
            population.epoch(rng).unwrap();
        }
    }
    population
}

fn bench_epoch(bench: &mut Criterion) {
    let mut rng = WyRng::seeded(0xf1a2e0);
    let fresh = evaluated(&mut rng, 0);
    let grown = evaluated(&mut rng, 25);

    bench.bench_function("epoch-fresh", |b| {
        b.iter_batched(
            || (fresh.clone(), rng.clone()),
            |(mut population, mut rng)| population.epoch(&mut rng),
            BatchSize::SmallInput,
        )
    });

    bench.bench_function("epoch-grown", |b| {
        b.iter_batched(
            || (grown.clone(), rng.clone()),
            |(mut population, mut rng)| population.epoch(&mut rng),
            BatchSize::SmallInput,
        )
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(100)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_epoch(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
