#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

pub mod constants;
pub mod crossover;
pub mod error;
pub mod genome;
pub mod macros;
pub mod network;
pub mod params;
pub mod population;
pub mod random;
pub mod reproduce;
pub mod scenario;
pub mod specie;
pub mod state;

pub use crossover::{crossover, Coefficients};
pub use error::{Error, Result};
pub use genome::{Connection, Genome, InnoGen, InnoHead, Node, NodeKind};
pub use network::{activate, Network};
pub use params::Parameters;
pub use population::Population;
pub use random::{default_rng, Happens, WyRng};
pub use scenario::{evolve, EvolutionHooks, Hook, Scenario, Stats};
pub use specie::Specie;
pub use state::{EpochStats, TrainingState};
