use std::collections::HashMap;

use crate::models::{AgentOutcome, AgentPreferences, BlockingPair, MatchReport};

/// Find every pair that blocks the matching in `report`.
///
/// `(p, r)` blocks when each finds the other acceptable and each is either
/// unmatched or ranks the other above its current partner. The preference
/// lists must be the ones the report was computed from.
pub fn find_blocking_pairs(
    proposers: &[AgentPreferences],
    proposees: &[AgentPreferences],
    report: &MatchReport,
) -> Vec<BlockingPair> {
    // id -> rank, built once per proposee
    let proposee_ranks: HashMap<&str, HashMap<&str, usize>> = proposees
        .iter()
        .map(|a| (a.id.as_str(), rank_map(a)))
        .collect();
    let proposer_partners = partner_map(&report.proposers);
    let proposee_partners = partner_map(&report.proposees);

    let mut blocking = Vec::new();

    for proposer in proposers {
        // Only candidates ranked above the current partner can block
        let cutoff = proposer_partners
            .get(proposer.id.as_str())
            .and_then(|partner| proposer.position_of(partner))
            .unwrap_or(proposer.preferences.len());

        for candidate in &proposer.preferences[..cutoff] {
            let Some(ranks) = proposee_ranks.get(candidate.as_str()) else {
                continue;
            };
            let Some(&suitor_rank) = ranks.get(proposer.id.as_str()) else {
                continue;
            };

            let current_rank = proposee_partners
                .get(candidate.as_str())
                .and_then(|partner| ranks.get(partner).copied());

            let prefers_proposer = match current_rank {
                Some(rank) => suitor_rank < rank,
                None => true,
            };

            if prefers_proposer {
                blocking.push(BlockingPair {
                    proposer: proposer.id.clone(),
                    proposee: candidate.clone(),
                });
            }
        }
    }

    blocking
}

/// First position of each entry in an agent's list
fn rank_map(agent: &AgentPreferences) -> HashMap<&str, usize> {
    let mut ranks = HashMap::with_capacity(agent.preferences.len());
    for (rank, id) in agent.preferences.iter().enumerate() {
        ranks.entry(id.as_str()).or_insert(rank);
    }
    ranks
}

fn partner_map(outcomes: &[AgentOutcome]) -> HashMap<&str, &str> {
    outcomes
        .iter()
        .filter_map(|o| Some((o.id.as_str(), o.partner.as_deref()?)))
        .collect()
}

/// True when no blocking pair exists
pub fn is_stable(
    proposers: &[AgentPreferences],
    proposees: &[AgentPreferences],
    report: &MatchReport,
) -> bool {
    find_blocking_pairs(proposers, proposees, report).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::{greedy_match, stable_match};

    fn agent(id: &str, prefs: &[&str]) -> AgentPreferences {
        AgentPreferences::new(id, prefs.iter().copied())
    }

    #[test]
    fn test_stable_result_has_no_blocking_pairs() {
        let proposers = vec![agent("A", &["X"]), agent("B", &["X", "Y"])];
        let proposees = vec![agent("X", &["B", "A"]), agent("Y", &["B"])];

        let report = stable_match(proposers.clone(), proposees.clone()).unwrap();
        assert!(is_stable(&proposers, &proposees, &report));
    }

    #[test]
    fn test_greedy_result_is_blocked() {
        let proposers = vec![agent("A", &["X"]), agent("B", &["X", "Y"])];
        let proposees = vec![agent("X", &["B", "A"]), agent("Y", &["B"])];

        let report = greedy_match(proposers.clone(), proposees.clone()).unwrap();
        let blocking = find_blocking_pairs(&proposers, &proposees, &report);

        assert_eq!(
            blocking,
            vec![BlockingPair {
                proposer: "B".to_string(),
                proposee: "X".to_string(),
            }]
        );
    }

    #[test]
    fn test_unmatched_pair_blocks() {
        let proposers = vec![agent("A", &["X"])];
        let proposees = vec![agent("X", &["A"])];
        // Nobody matched: (A, X) is mutually acceptable
        let report = stable_match(vec![agent("A", &[])], proposees.clone()).unwrap();

        assert!(!is_stable(&proposers, &proposees, &report));
    }

    #[test]
    fn test_one_sided_interest_does_not_block() {
        let proposers = vec![agent("A", &["X"])];
        let proposees = vec![agent("X", &[])];

        let report = stable_match(proposers.clone(), proposees.clone()).unwrap();
        assert_eq!(report.utility.match_count, 0);
        assert!(is_stable(&proposers, &proposees, &report));
    }

    /// Every mutually acceptable pair, checked directly against the lists
    fn naive_blocking_pairs(
        proposers: &[AgentPreferences],
        proposees: &[AgentPreferences],
        report: &MatchReport,
    ) -> Vec<BlockingPair> {
        let prefers = |agent: &AgentPreferences, other: &str, current: Option<&str>| {
            match (agent.position_of(other), current) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(rank), Some(partner)) => agent.position_of(partner).map_or(true, |p| rank < p),
            }
        };

        let mut pairs = Vec::new();
        for p in proposers {
            for r in proposees {
                let p_partner = report.partner_of(&p.id);
                let r_partner = report.proposee(&r.id).and_then(|o| o.partner.as_deref());
                if p_partner == Some(r.id.as_str()) {
                    continue;
                }
                if prefers(p, &r.id, p_partner) && prefers(r, &p.id, r_partner) {
                    pairs.push(BlockingPair {
                        proposer: p.id.clone(),
                        proposee: r.id.clone(),
                    });
                }
            }
        }
        pairs.sort_by(|a, b| (&a.proposer, &a.proposee).cmp(&(&b.proposer, &b.proposee)));
        pairs
    }

    #[test]
    fn test_audit_agrees_with_pairwise_check_on_large_market() {
        let size = 40;
        let proposers: Vec<_> = (0..size)
            .map(|i| {
                let prefs = (0..size).map(|k| format!("q{}", (i * 7 + k) % size));
                AgentPreferences::new(format!("p{}", i), prefs)
            })
            .collect();
        let proposees: Vec<_> = (0..size)
            .map(|j| {
                let prefs = (0..size).map(|k| format!("p{}", (j * 3 + size - k) % size));
                AgentPreferences::new(format!("q{}", j), prefs)
            })
            .collect();

        let stable = stable_match(proposers.clone(), proposees.clone()).unwrap();
        assert!(find_blocking_pairs(&proposers, &proposees, &stable).is_empty());
        assert!(naive_blocking_pairs(&proposers, &proposees, &stable).is_empty());

        let greedy = greedy_match(proposers.clone(), proposees.clone()).unwrap();
        let mut blocking = find_blocking_pairs(&proposers, &proposees, &greedy);
        blocking.sort_by(|a, b| (&a.proposer, &a.proposee).cmp(&(&b.proposer, &b.proposee)));
        assert_eq!(blocking, naive_blocking_pairs(&proposers, &proposees, &greedy));
    }
}
