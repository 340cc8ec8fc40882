use serde::Deserialize;
use std::fmt::Write;

use crate::models::{BlockingPair, MatchReport, TraceEvent};

/// Display names for the two sides, e.g. "Employer" and "Applicant"
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleLabels {
    #[serde(default = "default_proposer_label")]
    pub proposer: String,
    #[serde(default = "default_proposee_label")]
    pub proposee: String,
}

impl Default for RoleLabels {
    fn default() -> Self {
        Self {
            proposer: default_proposer_label(),
            proposee: default_proposee_label(),
        }
    }
}

fn default_proposer_label() -> String { "Employer".to_string() }
fn default_proposee_label() -> String { "Applicant".to_string() }

/// Render pairings and utility totals, one line per proposer
pub fn render_report(report: &MatchReport, labels: &RoleLabels) -> String {
    let mut out = String::new();

    for proposer in &report.proposers {
        match (&proposer.partner, proposer.partner_rank) {
            (Some(partner), Some(rank)) => {
                let partner_rank = report
                    .proposee(partner)
                    .and_then(|o| o.partner_rank)
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{} {} is paired with {} {}",
                    proposer.id, rank, partner, partner_rank
                );
            }
            _ => {
                let _ = writeln!(out, "{} is NOT paired", proposer.id);
            }
        }
    }

    let utility = &report.utility;
    let _ = writeln!(
        out,
        "Total Utility  {}  for  {}  matchings",
        utility.total_utility, utility.match_count
    );
    let _ = writeln!(out, "{} Utility {}", labels.proposer, utility.proposer_utility);
    let _ = writeln!(out, "{} Utility {}", labels.proposee, utility.proposee_utility);

    out
}

/// Render one engine event as a line of narration
pub fn render_event(event: &TraceEvent, labels: &RoleLabels) -> String {
    match event {
        TraceEvent::Queue { unmatched } => {
            format!("Unmatched {}s [{}]", labels.proposer, unmatched.join(", "))
        }
        TraceEvent::Exhausted { proposer } => format!("No more options for {}", proposer),
        TraceEvent::Proposed { proposer, proposee } => format!("{} proposes to {}", proposer, proposee),
        TraceEvent::Accepted { proposee, .. } => format!("   {} accepts the proposal", proposee),
        TraceEvent::Rejected { proposee, .. } => format!("   {} rejects the proposal", proposee),
        TraceEvent::Dumped { proposer, .. } => format!("   {} gets dumped", proposer),
        TraceEvent::StepComplete { .. } => "Tentative Pairings are as follows:".to_string(),
    }
}

/// Verbose narration of a traced run, one chunk of text per event.
///
/// Steps that pair or reject someone end with the tentative pairings. A step
/// whose proposer ran out of options ends without them.
#[derive(Debug)]
pub struct Narrator<'a> {
    labels: &'a RoleLabels,
    exhausted: bool,
}

impl<'a> Narrator<'a> {
    pub fn new(labels: &'a RoleLabels) -> Self {
        Self {
            labels,
            exhausted: false,
        }
    }

    /// Text to print for `event`, if any. `tentative` is only called when
    /// the tentative pairings are shown.
    pub fn narrate<F>(&mut self, event: &TraceEvent, tentative: F) -> Option<String>
    where
        F: FnOnce() -> MatchReport,
    {
        match event {
            TraceEvent::Exhausted { .. } => {
                self.exhausted = true;
                Some(render_event(event, self.labels))
            }
            TraceEvent::StepComplete { .. } => {
                if std::mem::take(&mut self.exhausted) {
                    return None;
                }
                Some(format!(
                    "{}\n{}",
                    render_event(event, self.labels),
                    render_report(&tentative(), self.labels).trim_end()
                ))
            }
            _ => Some(render_event(event, self.labels)),
        }
    }
}

/// Render a stability verdict
pub fn render_stability(blocking: &[BlockingPair], labels: &RoleLabels) -> String {
    if blocking.is_empty() {
        return "Matching is stable".to_string();
    }

    let mut out = format!("Matching is NOT stable ({} blocking pairs)", blocking.len());
    for pair in blocking {
        let _ = write!(
            out,
            "\n   {} {} and {} {} prefer each other",
            labels.proposer, pair.proposer, labels.proposee, pair.proposee
        );
    }
    out
}
