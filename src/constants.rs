//! Default evolution parameters.
//!
//! Every default is defined here with the `FLAREON_` prefix, and collected into
//! [crate::Parameters::default].

// ============================================================================
// Population Parameters
// ============================================================================

/// Number of genomes alive in every generation
pub const FLAREON_POPULATION_SIZE: usize = 150;

/// Number of top genomes carried over unchanged
pub const FLAREON_ELITE_COUNT: usize = 3;

/// Number of copies made of every elite
pub const FLAREON_ELITE_COPIES: usize = 2;

/// Share of the non-elite slots filled by mutated clones of the previous generation
pub const FLAREON_PREVIOUS_GEN_MUTATE_PERCENTAGE: f64 = 0.25;

/// Generations without a new best fitness before a specie is removed
pub const FLAREON_GENERATIONS_TO_STAGNATE: usize = 15;

// ============================================================================
// Network Shape
// ============================================================================

/// Sensory nodes of a fresh genome
pub const FLAREON_IN_NODES: usize = 2;

/// Action nodes of a fresh genome
pub const FLAREON_OUT_NODES: usize = 1;

// ============================================================================
// Mutation Parameters
// ============================================================================

/// Probability of adding a new connection
pub const FLAREON_ADD_CONNECTION_CHANCE: f64 = 0.05;

/// Probability of bisecting a connection (adding a node)
pub const FLAREON_ADD_NODE_CHANCE: f64 = 0.03;

/// Probability of touching the weights of a genome at all
pub const FLAREON_MUTATE_WEIGHTS_CHANCE: f64 = 0.8;

/// Probability of perturbing a weight rather than replacing it
pub const FLAREON_PERTURB_WEIGHT_CHANCE: f64 = 0.9;

/// Largest step a single weight perturbation may take
pub const FLAREON_MAX_WEIGHT_PERTURBATION: f64 = 0.1;

// ============================================================================
// Crossover Parameters
// ============================================================================

/// Probability of disabling an inherited gene that is disabled in either parent
pub const FLAREON_CROSSOVER_DISABLE_CONNECTION_CHANCE: f64 = 0.75;

/// Probability of choosing the second parent from the whole population
pub const FLAREON_INTERSPECIES_MATING_RATE: f64 = 0.001;

// ============================================================================
// Compatibility Coefficients
// ============================================================================

/// Coefficient for excess genes in compatibility distance calculation
pub const FLAREON_EXCESS_COEFFICIENT: f64 = 1.0;

/// Coefficient for disjoint genes in compatibility distance calculation
pub const FLAREON_DISJOINT_COEFFICIENT: f64 = 1.0;

/// Coefficient for weight differences in compatibility distance calculation
pub const FLAREON_WEIGHT_COEFFICIENT: f64 = 0.4;

/// Normalization applied to excess and disjoint counts
pub const FLAREON_NORMALIZATION: f64 = 1.0;

/// Genetic distance threshold for speciation
pub const FLAREON_COMPATIBILITY_THRESHOLD: f64 = 3.0;
