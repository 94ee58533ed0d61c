//! UI components built with Leptos.
//!
//! - [`upload`] - Drop zone, picker, selection preview and progress panel
//! - [`files`] - Table of stored files with download and delete actions
//! - [`status`] - Status line showing the latest notice
//! - [`icons`] - Centralized icon definitions

pub mod files;
pub mod icons;
pub mod status;
pub mod upload;

pub use files::FileList;
pub use status::StatusLine;
pub use upload::{ProgressPanel, UploadPanel};
