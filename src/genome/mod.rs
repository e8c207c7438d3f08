pub mod connection;
pub mod innogen;
pub mod mutate;
pub mod node;

pub use connection::Connection;
pub use innogen::{InnoGen, InnoHead};
pub use node::{Node, NodeKind};

use crate::{
    crossover::{delta, Coefficients},
    error::Result,
    network::Network,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// One evolvable individual. Nodes and connections are kept sorted by innovation id, which
/// alignment during crossover and compatibility checks relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub fitness: f64,
}

impl Genome {
    /// A new genome with no connections, whose sensory nodes are numbered `0..sensory` and
    /// whose action nodes directly follow them
    pub fn new(sensory: usize, action: usize) -> Self {
        let mut nodes = Vec::with_capacity(sensory + action);
        for inno in 0..sensory {
            nodes.push(Node::new(inno, NodeKind::Sensory));
        }
        for inno in sensory..sensory + action {
            nodes.push(Node::new(inno, NodeKind::Action));
        }

        Self {
            nodes,
            connections: vec![],
            fitness: 0.,
        }
    }

    /// Deep copy of this genome that has yet to be evaluated
    pub fn unevaluated(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            fitness: 0.,
        }
    }

    #[inline]
    pub fn sensory(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_sensory())
    }

    #[inline]
    pub fn action(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_action())
    }

    #[inline]
    pub fn has_node(&self, inno: usize) -> bool {
        self.nodes.binary_search_by_key(&inno, |n| n.inno).is_ok()
    }

    /// Genetic distance to another genome, see [delta]
    pub fn compatibility_distance(&self, c1: f64, c2: f64, c3: f64, n: f64, other: &Self) -> f64 {
        delta(
            &self.connections,
            &other.connections,
            &Coefficients { c1, c2, c3, n },
        )
    }

    #[inline]
    pub fn delta(&self, other: &Self, coefficients: &Coefficients) -> f64 {
        delta(&self.connections, &other.connections, coefficients)
    }

    pub fn sort(&mut self) {
        self.nodes.sort_by_key(|n| n.inno);
        self.connections.sort_by_key(|c| c.inno);
    }

    pub fn is_sorted(&self) -> bool {
        self.nodes.windows(2).all(|w| w[0].inno < w[1].inno)
            && self.connections.windows(2).all(|w| w[0].inno < w[1].inno)
    }

    pub fn network(&self) -> Network {
        Network::from_genome(self)
    }

    pub fn to_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string()?)?;
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_str(&fs::read_to_string(path)?)
    }
}
