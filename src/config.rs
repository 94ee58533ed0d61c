//! Front-end configuration.
//!
//! Wire-level constants live in [`cloudshelf_core::config`]. The page may
//! override the runtime settings with an inline TOML block:
//!
//! ```html
//! <script type="text/toml" id="cloudshelf-config">
//! base_url = "https://files.example.com"
//! hide_after_ms = 3000
//! </script>
//! ```

use cloudshelf_core::ClientConfig;
use leptos::prelude::document;
use tracing::{info, warn};

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name shown in the page header.
pub const APP_NAME: &str = "cloudshelf";

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Id of the inline `<script type="text/toml">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "cloudshelf-config";

/// Read the client configuration from the page, or defaults if it has none.
pub fn load_config() -> ClientConfig {
    let source = document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());

    match source {
        Some(source) => parse_config(&source),
        None => ClientConfig::default(),
    }
}

/// Parse a TOML override block. Invalid input is logged and ignored.
pub fn parse_config(source: &str) -> ClientConfig {
    match toml::from_str::<ClientConfig>(source) {
        Ok(config) => {
            info!(base_url = %config.base_url, "client configuration loaded");
            config
        }
        Err(err) => {
            warn!(error = %err, "invalid client configuration, using defaults");
            ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("base_url = \"/api\"\nhide_after_ms = 500\n");
        assert_eq!(config.base_url, "/api");
        assert_eq!(config.hide_after_ms, 500);
        assert_eq!(config.clear_after_ms, ClientConfig::default().clear_after_ms);
    }

    #[test]
    fn test_parse_empty_block() {
        assert_eq!(parse_config("\n   \n"), ClientConfig::default());
    }

    #[test]
    fn test_invalid_config_falls_back() {
        assert_eq!(parse_config("base_url = 42"), ClientConfig::default());
        assert_eq!(parse_config("not toml at all ["), ClientConfig::default());
    }
}
