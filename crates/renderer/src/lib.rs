//! Pure projection of session state into displayable structure.

pub mod markdown;
pub mod terminal;
pub mod view;

pub use markdown::{render_markdown, Block, Document, Inline};
pub use view::{
    preview_panel, project, submit_control, AssessmentBadge, BadgeTone, PreviewPanel,
    PreviewSource, ResultView, SubmitControl,
};
