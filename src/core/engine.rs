use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, trace};

use crate::core::agent::{Agent, Proposee, Proposer};
use crate::core::error::MatchError;
use crate::models::{
    AgentOutcome, AgentPreferences, MatchMode, MatchReport, Pairing, Side, TraceEvent,
    UtilitySummary,
};

type TraceHook<'a> = &'a mut dyn FnMut(&MatchingEngine, &TraceEvent);

/// Proposal/acceptance state machine for a single run
///
/// # Transitions
/// 1. Take the proposer at the front of the unmatched queue
/// 2. Exhausted list: drop it from the queue for good
/// 3. Otherwise propose to its next candidate under the active policy
/// 4. Rejected: it stays at the front and tries its next candidate
/// 5. Accepted: it leaves the queue, any displaced partner rejoins at the back
///
/// Every transition advances a cursor or shrinks the queue, so a run makes at
/// most one proposal per preference-list entry.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    mode: MatchMode,
    proposers: Vec<Proposer>,
    proposees: Vec<Proposee>,
    proposer_index: HashMap<String, usize>,
    proposee_index: HashMap<String, usize>,
    unmatched: VecDeque<usize>,
    proposals: usize,
    iterations: usize,
}

impl MatchingEngine {
    /// Build the agents for a run.
    ///
    /// Fails on duplicate identifiers within a side or duplicate entries
    /// within one preference list. Identifiers that do not exist on the other
    /// side are kept and simply never accepted.
    pub fn new(
        proposers: Vec<AgentPreferences>,
        proposees: Vec<AgentPreferences>,
        mode: MatchMode,
    ) -> Result<Self, MatchError> {
        let proposer_index = index_side(&proposers, Side::Proposer)?;
        let proposee_index = index_side(&proposees, Side::Proposee)?;

        let proposers: Vec<Proposer> = proposers
            .into_iter()
            .map(|agent| Proposer::new(agent.id, agent.preferences))
            .collect();
        let proposees: Vec<Proposee> = proposees
            .into_iter()
            .map(|agent| Proposee::new(agent.id, agent.preferences))
            .collect();

        Ok(Self {
            mode,
            unmatched: (0..proposers.len()).collect(),
            proposers,
            proposees,
            proposer_index,
            proposee_index,
            proposals: 0,
            iterations: 0,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// True once every proposer is matched or exhausted
    pub fn is_settled(&self) -> bool {
        self.unmatched.is_empty()
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Unmatched proposers still in play, queue order
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.unmatched.iter().map(|&i| self.proposers[i].id())
    }

    pub fn proposers(&self) -> &[Proposer] {
        &self.proposers
    }

    pub fn proposees(&self) -> &[Proposee] {
        &self.proposees
    }

    pub fn proposer(&self, id: &str) -> Option<&Proposer> {
        self.proposer_index.get(id).map(|&i| &self.proposers[i])
    }

    pub fn proposee(&self, id: &str) -> Option<&Proposee> {
        self.proposee_index.get(id).map(|&i| &self.proposees[i])
    }

    /// Perform one transition. Returns `false` if the engine was already settled.
    pub fn step(&mut self) -> bool {
        self.advance(None)
    }

    /// Drive the run to its fixed point
    pub fn run(mut self) -> MatchReport {
        while self.advance(None) {}
        self.finish()
    }

    /// Drive the run to its fixed point, handing every event to `observer`
    /// together with a read-only view of the engine. The engine is quiescent
    /// whenever a `StepComplete` event is delivered.
    pub fn run_traced<F>(mut self, mut observer: F) -> MatchReport
    where
        F: FnMut(&MatchingEngine, &TraceEvent),
    {
        while self.advance(Some(&mut observer)) {}
        self.finish()
    }

    /// Snapshot of the current pairings and rank-sum utility
    pub fn report(&self) -> MatchReport {
        let mut utility = UtilitySummary::default();
        let mut pairings = Vec::new();

        for proposer in &self.proposers {
            let (Some(partner), Some(proposer_rank)) = (proposer.partner(), proposer.partner_rank())
            else {
                continue;
            };
            let proposee_rank = self
                .proposee(partner)
                .and_then(Proposee::partner_rank)
                .unwrap_or_default();

            utility.match_count += 1;
            utility.proposer_utility += proposer_rank;
            utility.proposee_utility += proposee_rank;

            pairings.push(Pairing {
                proposer: proposer.id().to_owned(),
                proposer_rank,
                proposee: partner.to_owned(),
                proposee_rank,
            });
        }
        utility.total_utility = utility.proposer_utility + utility.proposee_utility;

        MatchReport {
            mode: self.mode,
            proposers: self.proposers.iter().map(outcome).collect(),
            proposees: self.proposees.iter().map(outcome).collect(),
            pairings,
            utility,
            proposals: self.proposals,
        }
    }

    fn finish(self) -> MatchReport {
        let report = self.report();
        info!(
            mode = %self.mode,
            matches = report.utility.match_count,
            proposals = self.proposals,
            total_utility = report.utility.total_utility,
            "matching run settled"
        );
        report
    }

    fn advance(&mut self, hook: Option<TraceHook<'_>>) -> bool {
        let mut hook = hook;
        let Some(&current) = self.unmatched.front() else {
            return false;
        };
        self.iterations += 1;

        trace!(queue = self.unmatched.len(), "iteration {}", self.iterations);
        self.emit(&mut hook, || TraceEvent::Queue {
            unmatched: self.unmatched().map(str::to_owned).collect(),
        });

        let proposer_id = self.proposers[current].id().to_owned();
        let target = match self.proposers[current].next_proposal() {
            Some(target) => target.to_owned(),
            None => {
                debug!(proposer = %proposer_id, "no more options");
                self.unmatched.pop_front();
                self.emit(&mut hook, || TraceEvent::Exhausted {
                    proposer: proposer_id.clone(),
                });
                self.end_step(&mut hook);
                return true;
            }
        };
        self.proposals += 1;

        debug!(proposer = %proposer_id, proposee = %target, "proposal");
        self.emit(&mut hook, || TraceEvent::Proposed {
            proposer: proposer_id.clone(),
            proposee: target.clone(),
        });

        // Unknown identifiers are unacceptable rather than an error
        let accepted_by = match self.proposee_index.get(&target) {
            Some(&index) => {
                let proposee = &mut self.proposees[index];
                let accepted = match self.mode {
                    MatchMode::Stable => proposee.evaluate_proposal(&proposer_id),
                    MatchMode::Greedy => proposee.evaluate_greedily(&proposer_id),
                };
                accepted.then_some(index)
            }
            None => None,
        };

        match accepted_by {
            Some(index) => self.enact(current, index, &mut hook),
            None => {
                debug!(proposer = %proposer_id, proposee = %target, "rejected");
                self.emit(&mut hook, || TraceEvent::Rejected {
                    proposer: proposer_id.clone(),
                    proposee: target.clone(),
                });
            }
        }

        self.end_step(&mut hook);
        true
    }

    /// Pair the proposer at the front of the queue with proposee `index`,
    /// evicting the proposee's previous partner if there was one.
    fn enact(&mut self, current: usize, index: usize, hook: &mut Option<TraceHook<'_>>) {
        let proposer_id = self.proposers[current].id().to_owned();
        let proposee_id = self.proposees[index].id().to_owned();
        let displaced = self.proposees[index].partner().map(str::to_owned);

        debug!(proposer = %proposer_id, proposee = %proposee_id, "accepted");
        self.emit(hook, || TraceEvent::Accepted {
            proposer: proposer_id.clone(),
            proposee: proposee_id.clone(),
        });

        if let Some(previous) = displaced {
            if let Some(&old) = self.proposer_index.get(&previous) {
                self.proposers[old].release();
                self.unmatched.push_back(old);
            }
            debug!(proposer = %previous, proposee = %proposee_id, "dumped");
            self.emit(hook, || TraceEvent::Dumped {
                proposer: previous.clone(),
                proposee: proposee_id.clone(),
            });
        }

        self.unmatched.pop_front();
        self.proposees[index].engage(&proposer_id);
        self.proposers[current].accept(&proposee_id);
    }

    fn end_step(&self, hook: &mut Option<TraceHook<'_>>) {
        self.emit(hook, || TraceEvent::StepComplete {
            iteration: self.iterations,
        });
    }

    fn emit(&self, hook: &mut Option<TraceHook<'_>>, event: impl FnOnce() -> TraceEvent) {
        if let Some(callback) = hook.as_mut() {
            let event = event();
            (*callback)(self, &event);
        }
    }
}

fn outcome<A: Agent>(agent: &A) -> AgentOutcome {
    AgentOutcome {
        id: agent.id().to_owned(),
        partner: agent.partner().map(str::to_owned),
        partner_rank: agent.partner_rank(),
    }
}

/// Map identifiers to arena slots, rejecting duplicates
fn index_side(agents: &[AgentPreferences], side: Side) -> Result<HashMap<String, usize>, MatchError> {
    let mut index = HashMap::with_capacity(agents.len());

    for (slot, agent) in agents.iter().enumerate() {
        if index.insert(agent.id.clone(), slot).is_some() {
            return Err(MatchError::DuplicateIdentifier {
                side,
                id: agent.id.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(agent.preferences.len());
        for entry in &agent.preferences {
            if !seen.insert(entry.as_str()) {
                return Err(MatchError::DuplicatePreference {
                    side,
                    id: agent.id.clone(),
                    entry: entry.clone(),
                });
            }
        }
    }

    Ok(index)
}
