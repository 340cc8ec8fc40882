use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{AgentPreferences, MatchMode};

/// Request to run a matching
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchRequest {
    #[validate(nested)]
    #[serde(default)]
    pub proposers: Vec<AgentPreferences>,
    #[validate(nested)]
    #[serde(default)]
    pub proposees: Vec<AgentPreferences>,
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub mode: Option<MatchMode>,
    /// Falls back to the configured default when absent
    #[serde(default, alias = "include_trace", rename = "includeTrace")]
    pub include_trace: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request() {
        let req: RunMatchRequest = serde_json::from_str(r#"{"proposers":[{"id":"A","preferences":["X"]}]}"#).unwrap();
        assert_eq!(req.proposers.len(), 1);
        assert!(req.proposees.is_empty());
        assert_eq!(req.mode, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_identifier_fails_validation() {
        let req: RunMatchRequest = serde_json::from_str(
            r#"{"proposers":[{"id":"","preferences":["X"]}],"mode":"greedy","includeTrace":true}"#,
        )
        .unwrap();
        assert_eq!(req.mode, Some(MatchMode::Greedy));
        assert_eq!(req.include_trace, Some(true));
        assert!(req.validate().is_err());
    }
}
