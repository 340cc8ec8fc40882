use crate::core::engine::MatchingEngine;
use crate::core::error::MatchError;
use crate::models::{AgentPreferences, MatchMode, MatchReport, Side, TraceEvent};

/// Entry point for running matchings with a fixed policy
///
/// Holds the acceptance policy and an optional cap on the size of each side,
/// and hands every run a fresh [`MatchingEngine`]. No state survives between
/// runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    mode: MatchMode,
    max_agents_per_side: Option<usize>,
}

impl Matcher {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            max_agents_per_side: None,
        }
    }

    /// Gale-Shapley deferred acceptance
    pub fn stable() -> Self {
        Self::new(MatchMode::Stable)
    }

    /// First-come-first-accepted matching
    pub fn greedy() -> Self {
        Self::new(MatchMode::Greedy)
    }

    /// Refuse inputs with more than `limit` agents on either side
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.max_agents_per_side = Some(limit);
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Validate the input and build an engine ready to run
    pub fn engine(
        &self,
        proposers: Vec<AgentPreferences>,
        proposees: Vec<AgentPreferences>,
    ) -> Result<MatchingEngine, MatchError> {
        if let Some(limit) = self.max_agents_per_side {
            check_limit(Side::Proposer, proposers.len(), limit)?;
            check_limit(Side::Proposee, proposees.len(), limit)?;
        }

        MatchingEngine::new(proposers, proposees, self.mode)
    }

    /// Run a matching to completion
    ///
    /// # Arguments
    /// * `proposers` - Agents making proposals, in queue order
    /// * `proposees` - Agents deciding on proposals
    ///
    /// # Returns
    /// The final pairings with per-agent ranks and rank-sum utility
    pub fn run(
        &self,
        proposers: Vec<AgentPreferences>,
        proposees: Vec<AgentPreferences>,
    ) -> Result<MatchReport, MatchError> {
        Ok(self.engine(proposers, proposees)?.run())
    }

    /// Run a matching to completion, passing every engine event to `observer`
    pub fn run_traced<F>(
        &self,
        proposers: Vec<AgentPreferences>,
        proposees: Vec<AgentPreferences>,
        observer: F,
    ) -> Result<MatchReport, MatchError>
    where
        F: FnMut(&MatchingEngine, &TraceEvent),
    {
        Ok(self.engine(proposers, proposees)?.run_traced(observer))
    }
}

fn check_limit(side: Side, count: usize, limit: usize) -> Result<(), MatchError> {
    if count > limit {
        return Err(MatchError::TooManyAgents { side, count, limit });
    }
    Ok(())
}

/// Stable matching with the proposers proposing
pub fn stable_match(
    proposers: Vec<AgentPreferences>,
    proposees: Vec<AgentPreferences>,
) -> Result<MatchReport, MatchError> {
    Matcher::stable().run(proposers, proposees)
}

/// Greedy matching: proposees keep the first acceptable suitor
pub fn greedy_match(
    proposers: Vec<AgentPreferences>,
    proposees: Vec<AgentPreferences>,
) -> Result<MatchReport, MatchError> {
    Matcher::greedy().run(proposers, proposees)
}
