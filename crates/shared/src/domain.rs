use serde::{Deserialize, Serialize};

use crate::error::SessionError;

pub const PASS_LABEL: &str = "PASS";
pub const FAIL_LABEL: &str = "FAIL";

/// Display classification of an assessment string.
///
/// Anything other than the exact `PASS` literal is treated like a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Pass,
    Fail,
}

impl Assessment {
    pub fn classify(raw: &str) -> Self {
        if raw == PASS_LABEL {
            Assessment::Pass
        } else {
            Assessment::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Assessment::Pass)
    }
}

/// Report returned by a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    overall_assessment: String,
    analysis_text: String,
}

impl AnalysisResult {
    pub fn new(overall_assessment: impl Into<String>, analysis_text: impl Into<String>) -> Self {
        Self {
            overall_assessment: overall_assessment.into(),
            analysis_text: analysis_text.into(),
        }
    }

    /// The assessment exactly as the service sent it.
    pub fn overall_assessment(&self) -> &str {
        &self.overall_assessment
    }

    pub fn assessment(&self) -> Assessment {
        Assessment::classify(&self.overall_assessment)
    }

    pub fn analysis_text(&self) -> &str {
        &self.analysis_text
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "payload", rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Pending,
    Resolved(AnalysisResult),
    Failed(SessionError),
}

impl SessionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionStatus::Pending)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionStatus::Resolved(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        match self {
            SessionStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Pending => "pending",
            SessionStatus::Resolved(_) => "resolved",
            SessionStatus::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSource;

    #[test]
    fn only_exact_pass_literal_classifies_as_pass() {
        assert_eq!(Assessment::classify("PASS"), Assessment::Pass);
        assert_eq!(Assessment::classify("FAIL"), Assessment::Fail);
        assert_eq!(Assessment::classify("pass"), Assessment::Fail);
        assert_eq!(Assessment::classify("INCONCLUSIVE"), Assessment::Fail);
    }

    #[test]
    fn unrecognized_assessment_keeps_literal() {
        let result = AnalysisResult::new("INCONCLUSIVE", "text");
        assert_eq!(result.overall_assessment(), "INCONCLUSIVE");
        assert!(!result.assessment().is_pass());
    }

    #[test]
    fn status_accessors_are_exclusive() {
        let resolved = SessionStatus::Resolved(AnalysisResult::new("PASS", "ok"));
        assert!(resolved.result().is_some());
        assert!(resolved.error().is_none());
        assert!(!resolved.is_pending());

        let failed = SessionStatus::Failed(SessionError::service("boom"));
        assert!(failed.result().is_none());
        assert_eq!(failed.error().map(|e| e.kind), Some(ErrorSource::Service));

        assert_eq!(SessionStatus::default(), SessionStatus::Idle);
        assert!(SessionStatus::Pending.is_pending());
    }

    #[test]
    fn status_serializes_with_state_tag() {
        let json = serde_json::to_value(SessionStatus::Failed(SessionError::no_file_selected()))
            .expect("json");
        assert_eq!(json["state"], "failed");
        assert_eq!(json["payload"]["kind"], "validation");
        assert_eq!(json["payload"]["message"], "no file selected");
    }
}
