//! Status-to-view projections. Every function here is pure and total.

use serde::Serialize;
use shared::{
    domain::{Assessment, AnalysisResult, SessionStatus},
    error::ErrorSource,
};

use crate::markdown::{render_markdown, Document};

pub const RESULTS_EMPTY_MESSAGE: &str = "No analysis results yet";
pub const PREVIEW_EMPTY_MESSAGE: &str = "No image uploaded yet";
pub const ERROR_TITLE: &str = "Error";
pub const SUBMIT_LABEL: &str = "Analyze";
pub const PENDING_LABEL: &str = "Analyzing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentBadge {
    /// The literal assessment string, shown verbatim.
    pub label: String,
    pub tone: BadgeTone,
}

impl AssessmentBadge {
    pub fn for_result(result: &AnalysisResult) -> Self {
        let tone = match result.assessment() {
            Assessment::Pass => BadgeTone::Pass,
            Assessment::Fail => BadgeTone::Fail,
        };
        Self {
            label: result.overall_assessment().to_string(),
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ResultView {
    Placeholder {
        message: &'static str,
    },
    Loading {
        label: &'static str,
    },
    ErrorBanner {
        title: &'static str,
        message: String,
        kind: ErrorSource,
    },
    Report {
        badge: AssessmentBadge,
        document: Document,
    },
}

pub fn project(status: &SessionStatus) -> ResultView {
    match status {
        SessionStatus::Idle => ResultView::Placeholder {
            message: RESULTS_EMPTY_MESSAGE,
        },
        SessionStatus::Pending => ResultView::Loading {
            label: PENDING_LABEL,
        },
        SessionStatus::Failed(err) => ResultView::ErrorBanner {
            title: ERROR_TITLE,
            message: err.message.clone(),
            kind: err.kind,
        },
        SessionStatus::Resolved(result) => ResultView::Report {
            badge: AssessmentBadge::for_result(result),
            document: render_markdown(result.analysis_text()),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub label: &'static str,
    pub enabled: bool,
}

pub fn submit_control(status: &SessionStatus, has_file: bool) -> SubmitControl {
    let pending = status.is_pending();
    SubmitControl {
        label: if pending { PENDING_LABEL } else { SUBMIT_LABEL },
        enabled: has_file && !pending,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSource<'a> {
    pub file_name: &'a str,
    pub uri: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PreviewPanel {
    Empty { message: &'static str },
    Image { file_name: String, uri: String },
}

pub fn preview_panel(current: Option<PreviewSource<'_>>) -> PreviewPanel {
    match current {
        Some(source) => PreviewPanel::Image {
            file_name: source.file_name.to_string(),
            uri: source.uri.to_string(),
        },
        None => PreviewPanel::Empty {
            message: PREVIEW_EMPTY_MESSAGE,
        },
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
