use super::{Connection, Genome, InnoGen, Node, NodeKind};
use crate::{params::Parameters, random::Happens};
use fxhash::FxHashSet;
use rand::{
    seq::{IndexedRandom, IteratorRandom},
    RngCore,
};
use std::collections::VecDeque;

impl Genome {
    /// Whether `to` is reachable from `from` by following connections forward. Disabled
    /// connections are followed too, as crossover may enable them again.
    pub fn can_reach(&self, from: usize, to: usize) -> bool {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(node) = queue.pop_front() {
            if node == to {
                return true;
            }

            for c in self.connections.iter().filter(|c| c.from == node) {
                if visited.insert(c.to) {
                    queue.push_back(c.to);
                }
            }
        }

        false
    }

    /// Every node that a new connection from `from` could point to without duplicating an
    /// existing path or closing a cycle
    pub fn open_targets(&self, from: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|to| {
                to.inno != from
                    && !to.is_sensory()
                    && !self.connections.iter().any(|c| c.path() == (from, to.inno))
                    && !self.can_reach(to.inno, from)
            })
            .map(|to| to.inno)
            .collect()
    }

    /// Connect a random non-action node to a random open target. Does nothing if the chosen
    /// source has nowhere to go.
    pub fn mutate_connection(&mut self, rng: &mut impl RngCore, inno: &mut InnoGen) {
        let Some(from) = self
            .nodes
            .iter()
            .filter(|n| !n.is_action())
            .map(|n| n.inno)
            .choose(rng)
        else {
            return;
        };

        let Some(&to) = self.open_targets(from).choose(rng) else {
            return;
        };

        let weight = rng.clamped();
        self.connections.push(Connection::new(from, to, weight, inno));
    }

    /// Split a random enabled connection with a new internal node. Does nothing if there are
    /// no enabled connections.
    pub fn mutate_bisection(&mut self, rng: &mut impl RngCore, inno: &mut InnoGen) {
        let Some(idx) = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.enabled)
            .map(|(idx, _)| idx)
            .choose(rng)
        else {
            return;
        };

        let center = inno.bisect(self.connections[idx].path());
        if self.has_node(center) {
            return;
        }

        let (first, second) = self.connections[idx].bisect(center, inno);
        self.nodes.push(Node::new(center, NodeKind::Internal));
        self.connections.push(first);
        self.connections.push(second);
    }

    /// Perturb each weight by at most `max_weight_perturbation`, or replace it outright
    pub fn mutate_weights(&mut self, params: &Parameters, rng: &mut impl RngCore) {
        for c in self.connections.iter_mut() {
            if rng.happens(params.perturb_weight_chance) {
                c.weight += rng.clamped() * params.max_weight_perturbation;
            } else {
                c.weight = rng.clamped();
            }
        }
    }

    /// Perform 0 or more mutations on this genome, leaving it sorted
    pub fn mutate(&mut self, params: &Parameters, rng: &mut impl RngCore, inno: &mut InnoGen) {
        if rng.happens(params.add_connection_chance) {
            self.mutate_connection(rng, inno);
        }
        if rng.happens(params.add_node_chance) {
            self.mutate_bisection(rng, inno);
        }
        if rng.happens(params.mutate_weights_chance) {
            self.mutate_weights(params, rng);
        }
        self.sort();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{genome::InnoHead, random::WyRng};

    fn conn(inno: usize, from: usize, to: usize) -> Connection {
        Connection {
            inno,
            from,
            to,
            weight: 0.5,
            enabled: true,
        }
    }

    fn fresh(sensory: usize, action: usize) -> InnoGen {
        InnoGen::new(InnoHead {
            connection: 0,
            node: sensory + action,
        })
    }

    #[test]
    fn test_open_targets() {
        let mut genome = Genome::new(2, 1);
        assert_eq!(genome.open_targets(0), vec![2]);
        assert_eq!(genome.open_targets(2), Vec::<usize>::new());

        genome.connections.push(conn(0, 0, 2));
        assert_eq!(genome.open_targets(0), Vec::<usize>::new());
        assert_eq!(genome.open_targets(1), vec![2]);
    }

    #[test]
    fn test_open_targets_no_cycle() {
        let mut genome = Genome::new(1, 1);
        genome.nodes.push(Node::new(2, NodeKind::Internal));
        genome.nodes.push(Node::new(3, NodeKind::Internal));
        genome.connections = vec![conn(0, 0, 2), conn(1, 2, 3), conn(2, 3, 1)];

        // 3 -> 2 would close 2 -> 3 -> 2
        assert_eq!(genome.open_targets(3), Vec::<usize>::new());
        assert_eq!(genome.open_targets(2), vec![1]);

        // disabled genes still count, as crossover may revive them
        genome.connections[1].enabled = false;
        assert_eq!(genome.open_targets(3), Vec::<usize>::new());
    }

    #[test]
    fn test_mutate_connection() {
        let mut rng = WyRng::seeded(11);
        let mut genome = Genome::new(3, 1);
        let mut inno = fresh(3, 1);

        genome.mutate_connection(&mut rng, &mut inno);
        assert_eq!(genome.connections.len(), 1);

        let c = &genome.connections[0];
        assert!(c.from < 3);
        assert_eq!(c.to, 3);
        assert!(c.enabled);
        assert!((-1. ..=1.).contains(&c.weight));
        assert_eq!(c.inno, 0);
    }

    #[test]
    fn test_mutate_connection_saturated() {
        let mut rng = WyRng::seeded(12);
        let mut genome = Genome::new(1, 1);
        genome.connections.push(conn(0, 0, 1));

        let before = genome.clone();
        for _ in 0..100 {
            genome.mutate_connection(&mut rng, &mut fresh(1, 1));
        }
        assert_eq!(genome, before);
    }

    #[test]
    fn test_mutate_connection_shares_inno() {
        let mut rng = WyRng::seeded(13);
        let mut inno = fresh(1, 1);

        let mut l = Genome::new(1, 1);
        let mut r = Genome::new(1, 1);
        l.mutate_connection(&mut rng, &mut inno);
        r.mutate_connection(&mut rng, &mut inno);

        assert_eq!(l.connections[0].path(), (0, 1));
        assert_eq!(l.connections[0].inno, r.connections[0].inno);
        assert_eq!(inno.head().connection, 1);
    }

    #[test]
    fn test_mutate_bisection() {
        let mut rng = WyRng::seeded(14);
        let mut inno = InnoGen::new(InnoHead {
            connection: 1,
            node: 2,
        });
        let mut genome = Genome::new(1, 1);
        genome.connections.push(Connection {
            weight: -0.25,
            ..conn(0, 0, 1)
        });

        genome.mutate_bisection(&mut rng, &mut inno);

        assert_eq!(genome.nodes.len(), 3);
        assert_eq!(genome.nodes[2], Node::new(2, NodeKind::Internal));

        assert!(!genome.connections[0].enabled);
        assert_eq!(genome.connections[1].path(), (0, 2));
        assert_eq!(genome.connections[1].weight, 1.);
        assert_eq!(genome.connections[1].inno, 1);
        assert!(genome.connections[1].enabled);
        assert_eq!(genome.connections[2].path(), (2, 1));
        assert_eq!(genome.connections[2].weight, -0.25);
        assert_eq!(genome.connections[2].inno, 2);
        assert!(genome.connections[2].enabled);
    }

    #[test]
    fn test_mutate_bisection_shares_inno() {
        let mut rng = WyRng::seeded(15);
        let mut inno = InnoGen::new(InnoHead {
            connection: 1,
            node: 2,
        });
        let mut l = Genome::new(1, 1);
        l.connections.push(conn(0, 0, 1));
        let mut r = l.clone();

        l.mutate_bisection(&mut rng, &mut inno);
        r.mutate_bisection(&mut rng, &mut inno);
        assert_eq!(l, r);
        assert_eq!(inno.head(), InnoHead { connection: 3, node: 3 });
    }

    #[test]
    fn test_mutate_bisection_nothing_enabled() {
        let mut rng = WyRng::seeded(16);
        let mut genome = Genome::new(1, 1);
        genome.mutate_bisection(&mut rng, &mut fresh(1, 1));
        assert!(genome.connections.is_empty());

        genome.connections.push(Connection {
            enabled: false,
            ..conn(0, 0, 1)
        });
        genome.mutate_bisection(&mut rng, &mut fresh(1, 1));
        assert_eq!(genome.connections.len(), 1);
        assert_eq!(genome.nodes.len(), 2);
    }

    #[test]
    fn test_mutate_weights() {
        let mut rng = WyRng::seeded(17);
        let mut genome = Genome::new(2, 1);
        genome.connections = vec![conn(0, 0, 2), conn(1, 1, 2)];

        let params = Parameters {
            perturb_weight_chance: 1.,
            max_weight_perturbation: 0.1,
            ..Default::default()
        };
        genome.mutate_weights(&params, &mut rng);
        for c in genome.connections.iter() {
            assert!((c.weight - 0.5).abs() <= 0.1 + 1e-12);
        }

        let params = Parameters {
            perturb_weight_chance: 0.,
            ..Default::default()
        };
        genome.mutate_weights(&params, &mut rng);
        for c in genome.connections.iter() {
            assert!((-1. ..=1.).contains(&c.weight));
        }
    }

    #[test]
    fn test_mutate_stays_sorted_and_acyclic() {
        let mut rng = WyRng::seeded(18);
        let params = Parameters {
            add_connection_chance: 0.8,
            add_node_chance: 0.5,
            ..Default::default()
        };
        let mut genome = Genome::new(3, 2);
        let mut head = InnoHead {
            connection: 0,
            node: 5,
        };

        for _ in 0..200 {
            let mut inno = InnoGen::new(head);
            genome.mutate(&params, &mut rng, &mut inno);
            head = inno.head();

            assert!(genome.is_sorted());
            let network = genome.network();
            assert!(network.is_complete());
            for c in genome.connections.iter() {
                assert!(!genome.nodes.iter().any(|n| n.inno == c.to && n.is_sensory()));
                assert!(!genome.nodes.iter().any(|n| n.inno == c.from && n.is_action()));
            }
        }
        assert!(genome.nodes.len() > 5);
    }
}
