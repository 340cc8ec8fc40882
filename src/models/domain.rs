use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// One agent's identity and ranked preferences, best first.
///
/// An identifier missing from `preferences` is unacceptable to this agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AgentPreferences {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl AgentPreferences {
    pub fn new<I, S>(id: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            preferences: preferences.into_iter().map(Into::into).collect(),
        }
    }

    /// 0-based position of `other` in this agent's list, if acceptable.
    #[inline]
    pub fn position_of(&self, other: &str) -> Option<usize> {
        self.preferences.iter().position(|p| p == other)
    }
}

/// Acceptance policy used by the proposees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Deferred acceptance: a proposee trades up whenever a better suitor arrives.
    #[default]
    Stable,
    /// First acceptable suitor wins; partners are never displaced.
    Greedy,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Stable => f.write_str("stable"),
            MatchMode::Greedy => f.write_str("greedy"),
        }
    }
}

/// Which group an agent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Proposer,
    Proposee,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Proposer => f.write_str("proposer"),
            Side::Proposee => f.write_str("proposee"),
        }
    }
}

/// Final state of a single agent after a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub id: String,
    pub partner: Option<String>,
    /// 1-based position of `partner` in this agent's list
    #[serde(rename = "partnerRank")]
    pub partner_rank: Option<usize>,
}

impl AgentOutcome {
    pub fn is_matched(&self) -> bool {
        self.partner.is_some()
    }
}

/// A matched pair together with how each side ranks the other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub proposer: String,
    #[serde(rename = "proposerRank")]
    pub proposer_rank: usize,
    pub proposee: String,
    #[serde(rename = "proposeeRank")]
    pub proposee_rank: usize,
}

/// Rank-sum utility of a matching. Lower sums mean happier agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilitySummary {
    #[serde(rename = "matchCount")]
    pub match_count: usize,
    #[serde(rename = "proposerUtility")]
    pub proposer_utility: usize,
    #[serde(rename = "proposeeUtility")]
    pub proposee_utility: usize,
    #[serde(rename = "totalUtility")]
    pub total_utility: usize,
}

/// Result of a matching run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub mode: MatchMode,
    /// Proposers in input order
    pub proposers: Vec<AgentOutcome>,
    /// Proposees in input order
    pub proposees: Vec<AgentOutcome>,
    pub pairings: Vec<Pairing>,
    pub utility: UtilitySummary,
    /// Number of proposals made, including ones to unknown identifiers
    pub proposals: usize,
}

impl MatchReport {
    pub fn proposer(&self, id: &str) -> Option<&AgentOutcome> {
        self.proposers.iter().find(|o| o.id == id)
    }

    pub fn proposee(&self, id: &str) -> Option<&AgentOutcome> {
        self.proposees.iter().find(|o| o.id == id)
    }

    /// Partner of a proposer, if it ended up matched
    pub fn partner_of(&self, proposer: &str) -> Option<&str> {
        self.proposer(proposer).and_then(|o| o.partner.as_deref())
    }

    pub fn unmatched_proposers(&self) -> impl Iterator<Item = &str> {
        self.proposers
            .iter()
            .filter(|o| !o.is_matched())
            .map(|o| o.id.as_str())
    }

    pub fn unmatched_proposees(&self) -> impl Iterator<Item = &str> {
        self.proposees
            .iter()
            .filter(|o| !o.is_matched())
            .map(|o| o.id.as_str())
    }
}

/// A pair that would both rather be with each other than with their partners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingPair {
    pub proposer: String,
    pub proposee: String,
}

/// Narration of one engine transition, delivered to the trace hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TraceEvent {
    /// Unmatched proposers at the start of an iteration, queue order
    Queue { unmatched: Vec<String> },
    /// The proposer ran out of candidates and leaves the queue unmatched
    Exhausted { proposer: String },
    Proposed { proposer: String, proposee: String },
    Accepted { proposer: String, proposee: String },
    Rejected { proposer: String, proposee: String },
    /// `proposer` lost `proposee` to a better suitor and rejoins the queue
    Dumped { proposer: String, proposee: String },
    /// End of an iteration; the engine is at a quiescent point
    StepComplete { iteration: usize },
}
