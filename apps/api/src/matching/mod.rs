// Matching: similarity ranking, skill set algebra and confidence scoring.
// Pure and synchronous; collaborators (embedding, catalog) are called by the handlers.

use thiserror::Error;

pub mod confidence;
pub mod handlers;
pub mod ranker;
pub mod skill_set;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Query vector has {actual} dimensions but the catalog uses {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
