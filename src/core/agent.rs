use std::collections::HashMap;

/// Fields the engine reads from either side of the market
pub trait Agent {
    fn id(&self) -> &str;

    /// Ranked candidates, best first
    fn preferences(&self) -> &[String];

    fn partner(&self) -> Option<&str>;

    /// 1-based position of the current partner in `preferences`
    fn partner_rank(&self) -> Option<usize>;

    fn is_matched(&self) -> bool {
        self.partner().is_some()
    }
}

/// State shared by both roles. `partner` and `partner_rank` are set and
/// cleared together.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AgentState {
    id: String,
    preferences: Vec<String>,
    partner: Option<String>,
    partner_rank: Option<usize>,
}

impl AgentState {
    fn new(id: String, preferences: Vec<String>) -> Self {
        Self {
            id,
            preferences,
            partner: None,
            partner_rank: None,
        }
    }
}

/// Agent that walks down its list making proposals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposer {
    state: AgentState,
    /// Index of the next candidate to try. Only ever moves forward.
    cursor: usize,
}

impl Proposer {
    pub fn new(id: impl Into<String>, preferences: Vec<String>) -> Self {
        Self {
            state: AgentState::new(id.into(), preferences),
            cursor: 0,
        }
    }

    /// Next untried candidate, or `None` once the list is used up.
    ///
    /// The cursor advances exactly once per productive call, so a proposer
    /// never proposes to the same candidate twice.
    pub fn next_proposal(&mut self) -> Option<&str> {
        let target = self.state.preferences.get(self.cursor)?;
        self.cursor += 1;
        Some(target.as_str())
    }

    /// Number of proposals made so far
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.state.preferences.len()
    }

    /// Record acceptance by `proposee`. The rank is the count of proposals
    /// made, including the accepted one.
    pub(crate) fn accept(&mut self, proposee: &str) {
        self.state.partner = Some(proposee.to_owned());
        self.state.partner_rank = Some(self.cursor);
    }

    /// Drop the current partner after being displaced
    pub(crate) fn release(&mut self) {
        self.state.partner = None;
        self.state.partner_rank = None;
    }
}

impl Agent for Proposer {
    fn id(&self) -> &str {
        &self.state.id
    }

    fn preferences(&self) -> &[String] {
        &self.state.preferences
    }

    fn partner(&self) -> Option<&str> {
        self.state.partner.as_deref()
    }

    fn partner_rank(&self) -> Option<usize> {
        self.state.partner_rank
    }
}

/// Agent that receives proposals and decides on them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposee {
    state: AgentState,
    /// identifier -> 0-based preference position, fixed at construction
    rank_lookup: HashMap<String, usize>,
}

impl Proposee {
    pub fn new(id: impl Into<String>, preferences: Vec<String>) -> Self {
        let rank_lookup = preferences
            .iter()
            .enumerate()
            .map(|(rank, name)| (name.clone(), rank))
            .collect();

        Self {
            state: AgentState::new(id.into(), preferences),
            rank_lookup,
        }
    }

    /// 0-based position of `suitor` in this proposee's list
    #[inline]
    pub fn rank_of(&self, suitor: &str) -> Option<usize> {
        self.rank_lookup.get(suitor).copied()
    }

    /// Deferred-acceptance decision.
    ///
    /// Accepts an acceptable suitor when unpartnered or when the suitor ranks
    /// strictly better than the current partner. On acceptance only
    /// `partner_rank` is updated; the engine assigns `partner` and evicts
    /// whoever was displaced.
    pub fn evaluate_proposal(&mut self, suitor: &str) -> bool {
        let Some(rank) = self.rank_of(suitor) else {
            return false;
        };

        let accept = match self.partner().and_then(|current| self.rank_of(current)) {
            Some(current_rank) => rank < current_rank,
            None => true,
        };

        if accept {
            self.state.partner_rank = Some(rank + 1);
        }
        accept
    }

    /// Greedy decision: the first acceptable suitor wins and is never displaced.
    pub fn evaluate_greedily(&mut self, suitor: &str) -> bool {
        let Some(rank) = self.rank_of(suitor) else {
            return false;
        };

        if self.is_matched() {
            return false;
        }

        self.state.partner_rank = Some(rank + 1);
        true
    }

    /// Enact an accepted proposal
    pub(crate) fn engage(&mut self, suitor: &str) {
        self.state.partner_rank = self.rank_of(suitor).map(|rank| rank + 1);
        self.state.partner = Some(suitor.to_owned());
    }
}

impl Agent for Proposee {
    fn id(&self) -> &str {
        &self.state.id
    }

    fn preferences(&self) -> &[String] {
        &self.state.preferences
    }

    fn partner(&self) -> Option<&str> {
        self.state.partner.as_deref()
    }

    fn partner_rank(&self) -> Option<usize> {
        self.state.partner_rank
    }
}
