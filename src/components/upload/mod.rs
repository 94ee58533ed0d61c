//! Upload UI components.
//!
//! Components:
//! - [`UploadPanel`] - Drop zone, file picker and upload controls
//! - [`SelectionPreview`] - Rows for the files picked so far
//! - [`ProgressPanel`] - Progress bar, file count and transfer speed

mod panel;
mod preview;
mod progress;

pub use panel::UploadPanel;
pub use preview::{PreviewItem, SelectionPreview};
pub use progress::ProgressPanel;
