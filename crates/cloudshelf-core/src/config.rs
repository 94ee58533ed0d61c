//! Client configuration.
//!
//! Centralizes the constants of the backend contract and the tunable
//! timings of the upload flow.

use serde::Deserialize;

// =============================================================================
// Backend Contract
// =============================================================================

/// Multipart field name every uploaded file is sent under.
pub const UPLOAD_FIELD: &str = "files";

/// Request header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// `<meta name=...>` holding the anti-forgery token in the page.
pub const CSRF_META_NAME: &str = "csrf-token";

// =============================================================================
// Upload Timings
// =============================================================================

/// Minimum time between two speed samples, in milliseconds.
pub const SPEED_SAMPLE_INTERVAL_MS: f64 = 500.0;

/// Default delay between a successful upload and clearing the selection.
pub const DEFAULT_CLEAR_AFTER_MS: u32 = 1000;

/// Default delay between clearing the selection and hiding the progress panel.
pub const DEFAULT_HIDE_AFTER_MS: u32 = 2000;

// =============================================================================
// ClientConfig
// =============================================================================

/// Runtime configuration of the client.
///
/// Every field has a default, so a partial (or empty) config document is valid.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix prepended to every endpoint path. Empty means same origin.
    pub base_url: String,
    /// Delay after upload success before the selection clears and the list reloads.
    pub clear_after_ms: u32,
    /// Delay after the reload before the progress panel hides.
    pub hide_after_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            clear_after_ms: DEFAULT_CLEAR_AFTER_MS,
            hide_after_ms: DEFAULT_HIDE_AFTER_MS,
        }
    }
}
