//! The whole set of species under evolution, and the epoch that turns one evaluated generation
//! into the next.

use crate::{
    crossover::crossover,
    error::{Error, Result},
    genome::{Genome, InnoGen, InnoHead},
    params::Parameters,
    random::Happens,
    reproduce::weighted_random_select,
    specie::Specie,
};
use rand::{seq::IndexedRandom, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    params: Parameters,
    species: Vec<Specie>,
    first_output_inno: usize,
    inno_head: InnoHead,
    generation: usize,
}

impl Population {
    /// A single specie of `population_size` unconnected genomes. Fails if `params` are invalid.
    pub fn new(params: Parameters, rng: &mut impl RngCore) -> Result<Self> {
        params.validate()?;

        let genome = Genome::new(params.in_nodes, params.out_nodes);
        let individuals = vec![genome; params.population_size];
        let repr = individuals.choose(rng).cloned();

        Ok(Self {
            species: vec![Specie {
                individuals,
                repr,
                ..Default::default()
            }],
            first_output_inno: params.in_nodes,
            inno_head: InnoHead {
                connection: 0,
                node: params.in_nodes + params.out_nodes,
            },
            generation: 0,
            params,
        })
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn species(&self) -> &[Specie] {
        &self.species
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Innovation id of the first action node, which maps to network output 0
    #[inline]
    pub fn first_output_inno(&self) -> usize {
        self.first_output_inno
    }

    #[inline]
    pub fn inno_head(&self) -> InnoHead {
        self.inno_head
    }

    /// Number of individuals across every specie
    pub fn len(&self) -> usize {
        self.species.iter().map(Specie::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genome> + Clone {
        self.species.iter().flat_map(|s| s.individuals.iter())
    }

    /// Every individual, for the evaluator to assign fitness before the next epoch
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Genome> {
        self.species.iter_mut().flat_map(|s| s.individuals.iter_mut())
    }

    pub fn fittest(&self) -> Option<&Genome> {
        self.iter().max_by(|l, r| l.fitness.total_cmp(&r.fitness))
    }

    /// Place a genome into the next generation of the first specie that admits it, founding
    /// a new specie otherwise. A `seeded` genome already carries a fitness, and one that founds
    /// a specie is also copied into its current individuals so it can be selected this epoch.
    fn insert(&mut self, genome: Genome, seeded: bool) {
        let coefficients = self.params.coefficients();
        let threshold = self.params.compatibility_threshold;

        match self
            .species
            .iter_mut()
            .find(|s| s.admits(&genome, &coefficients, threshold))
        {
            Some(specie) => specie.offspring.push(genome),
            None => {
                let mut specie = Specie::founded_by(genome);
                if seeded {
                    specie.individuals = specie.offspring.clone();
                }
                trace!(species = self.species.len() + 1, seeded, "founded specie");
                self.species.push(specie);
            }
        }
    }

    /// Drop every specie whose best fitness hasn't improved for too long
    fn cull_stagnant(&mut self) {
        let limit = self.params.generations_to_stagnate;
        let before = self.species.len();
        self.species.retain_mut(|s| s.observe() < limit);

        let removed = before - self.species.len();
        if removed > 0 {
            warn!(
                generation = self.generation,
                removed,
                remaining = self.species.len(),
                "culled stagnant species"
            );
        }
    }

    /// Divide each individual's fitness by the number of individuals anywhere in the
    /// population within the compatibility threshold of it, accumulating the result per
    /// specie. Selection later in the epoch sees the shared fitness. Returns the population
    /// total.
    fn share_fitness(&mut self) -> f64 {
        let coefficients = self.params.coefficients();
        let threshold = self.params.compatibility_threshold;

        let neighbours = {
            let everyone = self.iter().collect::<Vec<_>>();
            self.species
                .iter()
                .map(|s| {
                    s.individuals
                        .iter()
                        .map(|g| {
                            everyone
                                .iter()
                                .filter(|other| g.delta(other, &coefficients) < threshold)
                                .count()
                                .max(1)
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        };

        let mut total = 0.;
        for (specie, counts) in self.species.iter_mut().zip(neighbours.iter()) {
            for (genome, count) in specie.individuals.iter_mut().zip(counts.iter()) {
                genome.fitness /= *count as f64;
            }
            specie.fit_adjusted_total = specie.individuals.iter().map(|g| g.fitness).sum();
            total += specie.fit_adjusted_total;
        }
        total
    }

    /// Give each specie a share of `slots` proportional to its adjusted fitness
    fn allocate(&mut self, slots: usize, total: f64) {
        for specie in self.species.iter_mut() {
            specie.target_offspring = if total.is_finite() && total > 0. {
                (slots as f64 * specie.fit_adjusted_total / total).floor().max(0.) as usize
            } else {
                0
            };
        }
    }

    /// Cross two parents picked by the roulette wheel over the whole population
    fn breed_any(&self, rng: &mut impl RngCore) -> Result<Genome> {
        let extinct = || Error::Extinct {
            generation: self.generation,
        };
        let mom = weighted_random_select(self.iter(), rng).ok_or_else(extinct)?;
        let dad = weighted_random_select(self.iter(), rng).ok_or_else(extinct)?;
        Ok(crossover(
            mom,
            dad,
            self.params.crossover_disable_connection_chance,
            rng,
        ))
    }

    /// Cross a parent from specie `idx` with either a specie mate or, rarely, anyone at all
    fn breed_within(&self, idx: usize, rng: &mut impl RngCore) -> Option<Genome> {
        let members = self.species[idx].individuals.iter();
        let mom = weighted_random_select(members.clone(), rng)?;
        let dad = if rng.happens(self.params.interspecies_mating_rate) {
            weighted_random_select(self.iter(), rng)
        } else {
            weighted_random_select(members, rng)
        };
        Some(crossover(
            mom,
            dad?,
            self.params.crossover_disable_connection_chance,
            rng,
        ))
    }

    /// Replace the evaluated generation with the next one. Every individual must have its
    /// fitness assigned beforehand. Afterwards the population holds exactly `population_size`
    /// unevaluated genomes.
    pub fn epoch(&mut self, rng: &mut impl RngCore) -> Result<()> {
        self.cull_stagnant();
        if self.is_empty() {
            return Err(Error::Extinct {
                generation: self.generation,
            });
        }

        let params = self.params;
        let size = params.population_size;
        let mut inno = InnoGen::new(self.inno_head);
        let mut added = 0;

        let mut ranked = self
            .species
            .iter()
            .enumerate()
            .flat_map(|(s, specie)| (0..specie.len()).map(move |i| (s, i)))
            .collect::<Vec<_>>();
        ranked.sort_by(|&(ls, li), &(rs, ri)| {
            let (l, r) = (
                &self.species[ls].individuals[li],
                &self.species[rs].individuals[ri],
            );
            r.fitness.total_cmp(&l.fitness)
        });
        ranked.truncate(params.elite_count);

        'elites: for _ in 0..params.elite_copies {
            for &(s, i) in ranked.iter() {
                if added >= size {
                    break 'elites;
                }
                let elite = self.species[s].individuals[i].clone();
                self.insert(elite, true);
                added += 1;
            }
        }

        let clones = ((size - added) as f64 * params.previous_gen_mutate_percentage).floor() as usize;
        for _ in 0..clones {
            let Some(parent) = weighted_random_select(self.iter(), rng) else {
                break;
            };
            let mut clone = parent.clone();
            clone.mutate(&params, rng, &mut inno);
            self.insert(clone, true);
            added += 1;
        }

        let total = self.share_fitness();
        self.allocate(size - added, total);

        for idx in 0..self.species.len() {
            for _ in 0..self.species[idx].target_offspring {
                if added >= size {
                    break;
                }
                let Some(mut child) = self.breed_within(idx, rng) else {
                    break;
                };
                child.mutate(&params, rng, &mut inno);
                self.insert(child, false);
                added += 1;
            }
        }

        while added < size {
            let mut child = self.breed_any(rng)?;
            child.mutate(&params, rng, &mut inno);
            self.insert(child, false);
            added += 1;
        }

        for specie in self.species.iter_mut() {
            specie.advance(rng);
        }
        let before = self.species.len();
        self.species.retain(|s| s.repr.is_some());
        let pruned = before - self.species.len();
        if pruned > 0 {
            trace!(pruned, "pruned empty species");
        }

        self.generation += 1;
        self.inno_head = inno.head();
        debug!(
            generation = self.generation,
            species = self.species.len(),
            connection_head = self.inno_head.connection,
            node_head = self.inno_head.node,
            "epoch complete"
        );

        Ok(())
    }
}
