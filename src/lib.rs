//! Stable Match - Gale-Shapley deferred acceptance and greedy matching
//!
//! This library pairs two groups of agents, proposers and proposees, each
//! holding a ranked list over the other group. The core engine is pure and
//! sequential; file parsing, console rendering and the HTTP surface sit
//! around it.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{greedy_match, stable_match, find_blocking_pairs, is_stable, Matcher, MatchingEngine, MatchError};
pub use models::{AgentPreferences, MatchMode, MatchReport, TraceEvent};
