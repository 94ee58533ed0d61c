//! Server file inventory.

use serde::Deserialize;

use crate::api::{Endpoints, ErrorBody, HttpReply};
use crate::classify::{FileCategory, classify};
use crate::error::ApiError;
use crate::format::{format_bytes, format_timestamp};

/// Fallback shown when a failed delete carries no error text.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Metadata of one stored file, as reported by `GET /files`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    /// Unique key on the server.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Upload time, ISO-8601 or `YYYY-MM-DD HH:MM:SS`.
    pub uploaded_at: String,
}

/// One display row of the file table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRow {
    pub filename: String,
    pub size: String,
    pub uploaded: String,
    pub category: FileCategory,
    pub download_url: String,
}

/// The file table as last loaded from the server.
///
/// Always rebuilt from a complete listing; rows are never patched in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileTable {
    rows: Vec<FileRow>,
}

impl FileTable {
    pub fn from_records(records: &[RemoteFile], endpoints: &Endpoints) -> Self {
        let rows = records
            .iter()
            .map(|record| FileRow {
                filename: record.filename.clone(),
                size: format_bytes(record.size),
                uploaded: format_timestamp(&record.uploaded_at),
                category: classify(&record.filename, None),
                download_url: endpoints.download(&record.filename),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[FileRow] {
        &self.rows
    }

    /// Whether the "no files" placeholder should be shown instead of rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Interpret the answer to `GET /files`.
pub(crate) fn parse_listing(reply: &HttpReply) -> Result<Vec<RemoteFile>, ApiError> {
    if !reply.is_success() {
        return Err(ApiError::Http(reply.status));
    }
    serde_json::from_str(&reply.body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Interpret the answer to `DELETE /delete/{name}`.
///
/// Any 2xx status counts as success regardless of the body. Otherwise the
/// body's `error` field is surfaced, or a generic message if it has none.
pub(crate) fn check_delete(reply: &HttpReply) -> Result<(), ApiError> {
    if reply.is_success() {
        return Ok(());
    }
    let body: ErrorBody = serde_json::from_str(&reply.body).unwrap_or_default();
    let message = body
        .error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    Err(ApiError::Rejected(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str, size: u64) -> RemoteFile {
        RemoteFile {
            filename: filename.to_string(),
            size,
            uploaded_at: "2026-02-01 08:30:00".to_string(),
        }
    }

    #[test]
    fn test_table_rows() {
        let endpoints = Endpoints::new("");
        let table = FileTable::from_records(
            &[record("Report Q1.XLSX", 2048), record("a#b.png", 0)],
            &endpoints,
        );

        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.filename, "Report Q1.XLSX");
        assert_eq!(first.size, "2 KB");
        assert_eq!(first.uploaded, "01.02.2026, 08:30:00");
        assert_eq!(first.category, FileCategory::Spreadsheet);
        assert_eq!(first.download_url, "/download/Report%20Q1.XLSX");
        assert_eq!(table.rows()[1].download_url, "/download/a%23b.png");
    }

    #[test]
    fn test_empty_table() {
        let table = FileTable::from_records(&[], &Endpoints::new(""));
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_listing() {
        let reply = HttpReply::new(
            200,
            r#"[{"filename":"a.txt","size":12,"uploaded_at":"2026-01-01 00:00:00"}]"#,
        );
        let records = parse_listing(&reply).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "a.txt");
        assert_eq!(records[0].size, 12);
    }

    #[test]
    fn test_parse_listing_errors() {
        assert_eq!(
            parse_listing(&HttpReply::new(401, r#"{"error":"auth"}"#)),
            Err(ApiError::Http(401))
        );
        assert!(matches!(
            parse_listing(&HttpReply::new(200, r#"{"files":[]}"#)),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_check_delete() {
        assert_eq!(check_delete(&HttpReply::new(200, r#"{"message":"ok"}"#)), Ok(()));
        assert_eq!(check_delete(&HttpReply::new(204, "")), Ok(()));
        assert_eq!(
            check_delete(&HttpReply::new(404, r#"{"error":"File not found"}"#)),
            Err(ApiError::Rejected("File not found".to_string()))
        );
        assert_eq!(
            check_delete(&HttpReply::new(500, "Internal Server Error")),
            Err(ApiError::Rejected("Unknown error".to_string()))
        );
    }
}
