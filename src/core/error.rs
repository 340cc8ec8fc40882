use crate::models::Side;
use thiserror::Error;

/// Errors raised when building a matching run from malformed input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("duplicate {side} identifier: {id}")]
    DuplicateIdentifier { side: Side, id: String },

    #[error("{side} {id} lists {entry} more than once")]
    DuplicatePreference { side: Side, id: String, entry: String },

    #[error("too many {side}s: {count} exceeds the limit of {limit}")]
    TooManyAgents { side: Side, count: usize, limit: usize },
}
