// Core algorithm exports
pub mod agent;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod stability;

pub use agent::{Agent, Proposee, Proposer};
pub use engine::MatchingEngine;
pub use error::MatchError;
pub use matcher::{greedy_match, stable_match, Matcher};
pub use stability::{find_blocking_pairs, is_stable};
