//! Wire format of the analysis service.

use serde::{Deserialize, Serialize};

use crate::domain::AnalysisResult;

pub const ANALYZE_PATH: &str = "analyze/";
pub const HEALTH_PATH: &str = "health";
/// Multipart field carrying the image bytes.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub overall_assessment: String,
    pub analysis: String,
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(value: AnalyzeResponse) -> Self {
        AnalysisResult::new(value.overall_assessment, value.analysis)
    }
}

/// Body of a non-success response. `detail` is only usable when it is a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn detail_message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|detail| detail.as_str())
            .filter(|detail| !detail.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
