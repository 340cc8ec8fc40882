// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AgentPreferences, AgentOutcome, Pairing, UtilitySummary, MatchReport, MatchMode, Side, BlockingPair, TraceEvent};
pub use requests::RunMatchRequest;
pub use responses::{RunMatchResponse, HealthResponse, ErrorResponse};
