//! File selection and its derived preview.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::preview::{PreviewHandle, PreviewRegistry};

/// Hint given to file pickers. Selection is never rejected on this basis.
pub const ACCEPTED_MIME_HINT: &str = "image/*";
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file as handed over by a picker.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub mime_type: Option<String>,
    pub content: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            content,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub async fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, content))
    }

    fn resolved_mime_type(&self) -> String {
        self.mime_type
            .clone()
            .filter(|mime| !mime.trim().is_empty())
            .or_else(|| {
                mime_guess::from_path(&self.name)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
            .unwrap_or_else(|| FALLBACK_MIME.to_string())
    }
}

/// The currently selected file together with its live preview reference.
#[derive(Debug)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    content: Arc<[u8]>,
    preview: PreviewHandle,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> &Arc<[u8]> {
        &self.content
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    pub fn preview_uri(&self) -> String {
        self.preview.uri()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

pub struct UploadController {
    previews: PreviewRegistry,
    current: Option<SelectedFile>,
}

impl UploadController {
    pub fn new(previews: PreviewRegistry) -> Self {
        Self {
            previews,
            current: None,
        }
    }

    /// Replaces the current selection. `None` (a cancelled picker) leaves it untouched.
    pub fn select_file(&mut self, input: Option<FileInput>) {
        let Some(input) = input else {
            debug!("file selection cancelled; keeping current selection");
            return;
        };

        // The superseded preview is revoked before the new one is registered.
        if let Some(previous) = self.current.take() {
            debug!(file = previous.name(), "replacing selected file");
            drop(previous);
        }

        let mime_type = input.resolved_mime_type();
        if !mime_type.starts_with("image/") {
            warn!(
                file = %input.name,
                mime_type = %mime_type,
                hint = ACCEPTED_MIME_HINT,
                "selected file does not look like an image"
            );
        }

        let content: Arc<[u8]> = Arc::from(input.content);
        let preview = self.previews.create(&mime_type, content.clone());
        debug!(file = %input.name, size_bytes = content.len(), "file selected");
        self.current = Some(SelectedFile {
            name: input.name,
            mime_type,
            content,
            preview,
        });
    }

    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.current.take() {
            debug!(file = previous.name(), "selection cleared");
        }
    }

    pub fn current_file(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new(PreviewRegistry::new())
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
