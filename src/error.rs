use thiserror::Error;

/// Everything that can go wrong while configuring, evolving, or persisting a population.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("every specie went extinct before generation {generation} could reproduce")]
    Extinct { generation: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
