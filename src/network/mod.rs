//! Executable networks compiled from [Genome]s. A genome's enabled connections always form an
//! acyclic graph, so a network is evaluated in a single pass over its topological order.

use crate::genome::{Genome, NodeKind};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod activate {
    use core::f64::consts::E;

    pub fn tanh(x: f64) -> f64 {
        x.tanh()
    }

    pub fn steep_sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-4.9 * x))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub inno: usize,
    pub kind: NodeKind,
    pub activation: f64,
    /// longest path, in connections, from any node without inputs
    pub layer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    neurons: Vec<Neuron>,
    /// neuron index by innovation id
    index: FxHashMap<usize, usize>,
    /// neuron indices in topological order
    order: Vec<usize>,
    /// (to, weight) for every enabled connection, indexed by the source neuron
    adj: Vec<Vec<(usize, f64)>>,
    /// (from, weight) for every enabled connection, indexed by the target neuron
    adj_inv: Vec<Vec<(usize, f64)>>,
    first_action: usize,
}

impl Network {
    /// Compile a genome. The network holds a copy of what it needs, and must be compiled again
    /// whenever the genome changes.
    pub fn from_genome(genome: &Genome) -> Self {
        let neurons = genome
            .nodes
            .iter()
            .map(|n| Neuron {
                inno: n.inno,
                kind: n.kind,
                activation: 0.,
                layer: 0,
            })
            .collect::<Vec<_>>();
        let index = neurons
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.inno, idx))
            .collect::<FxHashMap<_, _>>();

        let mut adj = vec![vec![]; neurons.len()];
        let mut adj_inv = vec![vec![]; neurons.len()];
        let mut in_degree = vec![0usize; neurons.len()];
        for c in genome.connections.iter().filter(|c| c.enabled) {
            let (Some(&from), Some(&to)) = (index.get(&c.from), index.get(&c.to)) else {
                continue;
            };
            adj[from].push((to, c.weight));
            adj_inv[to].push((from, c.weight));
            in_degree[to] += 1;
        }

        let first_action = genome
            .action()
            .map(|n| n.inno)
            .min()
            .unwrap_or(usize::MAX);

        let mut network = Self {
            neurons,
            index,
            order: vec![],
            adj,
            adj_inv,
            first_action,
        };
        network.sort(in_degree);
        network
    }

    /// Kahn's algorithm, recording each neuron's layer as its edges are relaxed
    fn sort(&mut self, mut in_degree: Vec<usize>) {
        let mut order = (0..self.neurons.len())
            .filter(|idx| in_degree[*idx] == 0)
            .collect::<Vec<_>>();

        let mut head = 0;
        while head < order.len() {
            let from = order[head];
            let layer = self.neurons[from].layer + 1;
            for &(to, _) in self.adj[from].iter() {
                self.neurons[to].layer = self.neurons[to].layer.max(layer);
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    order.push(to);
                }
            }
            head += 1;
        }

        self.order = order;
    }

    /// Evaluate the network with `tanh`, see [Network::forward_with]
    pub fn forward(&mut self, inputs: &[f64], output_count: usize) -> Vec<f64> {
        self.forward_with(inputs, output_count, activate::tanh)
    }

    /// Evaluate the network once. Sensory neuron `i` reads `inputs[i]`, or 1 if there is no
    /// such input. Any other neuron without inputs is fixed at 1, and the rest activate with σ
    /// over their weighted inputs. Action neurons are written to the output in id order.
    pub fn forward_with<F: Fn(f64) -> f64>(
        &mut self,
        inputs: &[f64],
        output_count: usize,
        σ: F,
    ) -> Vec<f64> {
        let mut output = vec![0.; output_count];
        for &idx in self.order.iter() {
            let neuron = &self.neurons[idx];
            let activation = match neuron.kind {
                NodeKind::Sensory => inputs.get(neuron.inno).copied().unwrap_or(1.),
                _ if self.adj_inv[idx].is_empty() => 1.,
                _ => σ(self.adj_inv[idx]
                    .iter()
                    .map(|&(from, w)| self.neurons[from].activation * w)
                    .sum()),
            };

            let neuron = &mut self.neurons[idx];
            neuron.activation = activation;
            if matches!(neuron.kind, NodeKind::Action) {
                if let Some(slot) = neuron
                    .inno
                    .checked_sub(self.first_action)
                    .and_then(|i| output.get_mut(i))
                {
                    *slot = activation;
                }
            }
        }

        output
    }

    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, inno: usize) -> Option<&Neuron> {
        self.index.get(&inno).map(|idx| &self.neurons[*idx])
    }

    /// Innovation ids of every neuron, in evaluation order
    pub fn order(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().map(|idx| self.neurons[*idx].inno)
    }

    /// Activations from the most recent evaluation, indexed like [Network::neurons]
    pub fn activations(&self) -> impl Iterator<Item = f64> + '_ {
        self.neurons.iter().map(|n| n.activation)
    }

    fn edges<'a>(
        &'a self,
        adj: &'a [Vec<(usize, f64)>],
        inno: usize,
    ) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.index
            .get(&inno)
            .map_or(&[][..], |idx| adj[*idx].as_slice())
            .iter()
            .map(|&(idx, w)| (self.neurons[idx].inno, w))
    }

    /// (to, weight) of every enabled connection leaving a neuron
    pub fn outgoing(&self, inno: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.edges(&self.adj, inno)
    }

    /// (from, weight) of every enabled connection entering a neuron
    pub fn incoming(&self, inno: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.edges(&self.adj_inv, inno)
    }

    /// Whether the topological order covers every neuron exactly once, which holds for any
    /// acyclic genome
    pub fn is_complete(&self) -> bool {
        let mut seen = vec![false; self.neurons.len()];
        self.order.len() == self.neurons.len()
            && self.order.iter().all(|idx| !std::mem::replace(&mut seen[*idx], true))
    }

    pub fn layers(&self) -> usize {
        self.neurons
            .iter()
            .map(|n| n.layer + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn nodes_per_layer(&self) -> Vec<usize> {
        let mut counts = vec![0; self.layers()];
        for n in self.neurons.iter() {
            counts[n.layer] += 1;
        }
        counts
    }
}
