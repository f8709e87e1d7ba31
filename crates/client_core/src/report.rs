use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shared::domain::AnalysisResult;
use tracing::info;

pub fn default_report_name(now: DateTime<Utc>) -> String {
    format!("analysis_result_{}.md", now.format("%Y%m%dT%H%M%SZ"))
}

pub fn format_report(result: &AnalysisResult) -> String {
    format!(
        "Overall assessment: {}\n\n{}\n",
        result.overall_assessment(),
        result.analysis_text().trim_end()
    )
}

/// Writes the report to `output_dir/file_name`, creating the directory first.
pub fn save_report(result: &AnalysisResult, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create report directory '{}'",
            output_dir.display()
        )
    })?;
    let path = output_dir.join(file_name);
    std::fs::write(&path, format_report(result))
        .with_context(|| format!("failed to write report '{}'", path.display()))?;
    info!(path = %path.display(), "analysis report saved");
    Ok(path)
}
