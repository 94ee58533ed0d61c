//! Backend contract.
//!
//! The client talks to four routes:
//!
//! | Route | Method | Body |
//! |-------|--------|------|
//! | `/upload` | POST | multipart, every file under [`UPLOAD_FIELD`](crate::config::UPLOAD_FIELD) |
//! | `/files` | GET | JSON array of [`RemoteFile`](crate::RemoteFile) |
//! | `/download/{name}` | GET | file content (browser navigation) |
//! | `/delete/{name}` | DELETE | JSON `{ error? }` |
//!
//! [`Backend`] abstracts the transport and [`Clock`] abstracts time, so the
//! [`FileManager`](crate::FileManager) runs unchanged in the browser and in tests.

use std::future::Future;

use futures::Stream;
use serde::Deserialize;

use crate::error::{ApiError, UploadError};
use crate::selection::LocalFile;

// =============================================================================
// Endpoints
// =============================================================================

/// URL builder for the backend routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Create endpoints under `base_url` (empty for same origin).
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn upload(&self) -> String {
        format!("{}/upload", self.base)
    }

    pub fn files(&self) -> String {
        format!("{}/files", self.base)
    }

    /// Download URL with the file name percent-encoded.
    pub fn download(&self, filename: &str) -> String {
        format!("{}/download/{}", self.base, urlencoding::encode(filename))
    }

    /// Delete URL with the file name percent-encoded.
    pub fn delete(&self, filename: &str) -> String {
        format!("{}/delete/{}", self.base, urlencoding::encode(filename))
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Raw HTTP response as seen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Body of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// Human-readable summary shown to the user.
    pub message: String,
    /// Names the server stored the files under (may differ from the originals).
    #[serde(default)]
    pub files: Vec<String>,
}

/// Body of a failed delete.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Low-level events reported by the upload transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// Request body bytes sent so far. `total` is `None` when the length
    /// is not computable.
    Progress { loaded: u64, total: Option<u64> },
    /// The server answered.
    Completed(HttpReply),
    /// The request failed before a response arrived.
    NetworkError,
    /// The request was aborted.
    Aborted,
}

// =============================================================================
// Seams
// =============================================================================

/// Cancels an in-flight upload.
pub trait AbortHandle {
    fn abort(&self);
}

/// HTTP transport used by the [`FileManager`](crate::FileManager).
pub trait Backend {
    type File: LocalFile;
    type Abort: AbortHandle;
    /// Events of one upload. Must end after a terminal event.
    type Events: Stream<Item = TransportEvent> + Unpin;

    /// Start a multipart upload of `files` to `url`.
    fn send_files(
        &self,
        url: &str,
        files: &[Self::File],
    ) -> Result<(Self::Abort, Self::Events), UploadError>;

    /// Issue a GET request.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpReply, ApiError>>;

    /// Issue a DELETE request.
    fn delete(&self, url: &str) -> impl Future<Output = Result<HttpReply, ApiError>>;
}

/// Source of time for speed sampling and user-visible delays.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;

    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_same_origin() {
        let endpoints = Endpoints::new("");
        assert_eq!(endpoints.upload(), "/upload");
        assert_eq!(endpoints.files(), "/files");
        assert_eq!(endpoints.download("a.txt"), "/download/a.txt");
    }

    #[test]
    fn test_endpoints_base_url() {
        let endpoints = Endpoints::new("https://cloud.example/api/");
        assert_eq!(endpoints.files(), "https://cloud.example/api/files");
    }

    #[test]
    fn test_filename_percent_encoded() {
        let endpoints = Endpoints::new("");
        assert_eq!(endpoints.delete("my file#1.txt"), "/delete/my%20file%231.txt");
        assert_eq!(endpoints.download("a/b?.pdf"), "/download/a%2Fb%3F.pdf");
        assert_eq!(
            endpoints.download("отчёт.pdf"),
            "/download/%D0%BE%D1%82%D1%87%D1%91%D1%82.pdf"
        );
    }

    #[test]
    fn test_http_reply_success_range() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
        assert!(!HttpReply::new(500, "").is_success());
    }

    #[test]
    fn test_upload_response_files_optional() {
        let body: UploadResponse = serde_json::from_str(r#"{"message":"OK"}"#).unwrap();
        assert_eq!(body.message, "OK");
        assert!(body.files.is_empty());
    }
}
