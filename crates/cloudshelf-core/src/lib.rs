//! Browser-independent core of the cloudshelf file manager.
//!
//! Everything the UI shows is derived from a [`FileManager`]:
//! - [`SelectionSet`] - files picked for upload, in display order
//! - [`render_preview`] - rows for the selection preview
//! - [`ProgressStream`] - lazy stream of upload progress samples
//! - [`FileTable`] - the server's file inventory as display rows
//!
//! The network and the clock are reached through the [`Backend`] and
//! [`Clock`] traits so the whole flow can be driven from tests.

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod files;
pub mod format;
mod manager;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod preview;
pub mod selection;
pub mod upload;

pub use api::{AbortHandle, Backend, Clock, Endpoints, HttpReply, TransportEvent, UploadResponse};
pub use classify::{FileCategory, classify};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind, UploadError};
pub use files::{FileRow, FileTable, RemoteFile};
pub use manager::{Change, FileManager, Notice, NoticeLevel};
pub use preview::{PreviewRow, render_preview};
pub use selection::{LocalFile, SelectionSet};
pub use upload::{
    ProgressSample, ProgressStream, TransferSpeed, UploadPhase, UploadSession, UploadUpdate,
    UploadView,
};
