//! Client side of the spark plug analyzer: file selection, preview references and
//! the analysis request lifecycle.

pub mod config;
pub mod preview;
pub mod report;
pub mod session;
pub mod transport;
pub mod upload;

pub use config::{load_settings, ClientSettings, ConfigError};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use session::{AnalysisSession, Begin, PendingSubmission, SubmitOutcome};
pub use transport::{AnalysisRequest, AnalysisTransport, HttpAnalysisTransport};
pub use upload::{FileInput, SelectedFile, UploadController, ACCEPTED_MIME_HINT};
