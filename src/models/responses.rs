use serde::{Deserialize, Serialize};
use crate::models::domain::{BlockingPair, MatchMode, MatchReport, TraceEvent};

/// Response for the run endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub mode: MatchMode,
    pub report: MatchReport,
    pub stable: bool,
    #[serde(rename = "blockingPairs")]
    pub blocking_pairs: Vec<BlockingPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceEvent>>,
    #[serde(rename = "completedAt")]
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
