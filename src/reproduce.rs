//! Parent selection shared by every stage of reproduction.

use crate::genome::Genome;
use rand::{seq::IteratorRandom, Rng, RngCore};
use tracing::trace;

/// Select a random genome with probability proportional to its fitness. Negative fitness
/// weighs as much as zero fitness. When no genome has a usable weight, or the weights don't
/// sum to a finite value, every genome is equally likely. Only an empty pool selects nothing.
pub fn weighted_random_select<'a, I>(pool: I, rng: &mut impl RngCore) -> Option<&'a Genome>
where
    I: Iterator<Item = &'a Genome> + Clone,
{
    let weight = |g: &Genome| if g.fitness > 0. { g.fitness } else { 0. };
    let total = pool.clone().map(weight).sum::<f64>();

    if !(total.is_finite() && total > 0.) {
        trace!(total, "roulette selection fell back to a uniform choice");
        return pool.choose(rng);
    }

    let mut threshold = rng.random::<f64>() * total;
    let mut last = None;
    for genome in pool {
        let w = weight(genome);
        if w == 0. {
            continue;
        }
        threshold -= w;
        if threshold < 0. {
            return Some(genome);
        }
        last = Some(genome);
    }

    // float error may leave threshold a hair above 0 after the final weight
    last
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::WyRng;
    use rand::{rngs::StdRng, SeedableRng};

    fn scored(fitness: &[f64]) -> Vec<Genome> {
        fitness
            .iter()
            .map(|&fitness| Genome {
                fitness,
                ..Genome::new(1, 1)
            })
            .collect()
    }

    fn histogram(pool: &[Genome], rng: &mut impl RngCore, draws: usize) -> Vec<usize> {
        let mut counts = vec![0; pool.len()];
        for _ in 0..draws {
            let picked = weighted_random_select(pool.iter(), rng).unwrap();
            let idx = pool.iter().position(|g| std::ptr::eq(g, picked)).unwrap();
            counts[idx] += 1;
        }
        counts
    }

    #[test]
    fn test_empty() {
        let mut rng = WyRng::seeded(31);
        assert!(weighted_random_select(std::iter::empty::<&Genome>(), &mut rng).is_none());
    }

    #[test]
    fn test_proportional() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = scored(&[1., 2., 10.]);
        let counts = histogram(&pool, &mut rng, 13_000);

        assert!(counts[0] > 500 && counts[0] < 1500, "{counts:?}");
        assert!(counts[1] > 1500 && counts[1] < 2500, "{counts:?}");
        assert!(counts[2] > 9000 && counts[2] < 11000, "{counts:?}");
    }

    #[test]
    fn test_zero_weight_never_picked() {
        let mut rng = WyRng::seeded(32);
        let pool = scored(&[0., 5., -3., 0.]);
        assert_eq!(histogram(&pool, &mut rng, 1000), vec![0, 1000, 0, 0]);
    }

    #[test]
    fn test_uniform_fallback() {
        let mut rng = WyRng::seeded(33);
        for fitness in [[0., 0., 0.], [-1., -2., 0.], [f64::INFINITY, 1., 1.]] {
            let pool = scored(&fitness);
            let counts = histogram(&pool, &mut rng, 3000);
            assert!(counts.iter().all(|c| *c > 800), "{fitness:?}: {counts:?}");
        }
    }
}
