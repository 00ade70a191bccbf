//! Error code catalog and lookup.
//!
//! This module provides access to the centralized error catalog, which maps
//! error codes (like "F-1-2") to their metadata (title, message template, docs URL, etc.).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "figures", "references", "config")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message template
    pub message_template: String,

    /// URL to documentation (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, loaded lazily from JSON embedded at compile time.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid. This can only happen if someone
/// edits `error_catalog.json` by hand incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data)
        .expect("Invalid error catalog JSON - this is a bug in pandoc-fignos")
});

/// Look up error code information.
///
/// ```
/// use fignos_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("F-1-2").unwrap();
/// assert_eq!(info.title, "Unresolved Reference");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get documentation URL for an error code.
pub fn get_docs_url(code: &str) -> Option<&str> {
    ERROR_CATALOG
        .get(code)
        .and_then(|info| info.docs_url.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_recoverable_codes_exist() {
        for code in ["F-1-1", "F-1-2", "F-1-3", "F-2-1"] {
            assert!(get_error_info(code).is_some(), "missing {code}");
        }
    }

    #[test]
    fn test_internal_error_exists() {
        let info = get_error_info("F-0-1").unwrap();
        assert_eq!(info.subsystem, "internal");
        assert_eq!(info.title, "Internal Error");
        assert!(info.docs_url.is_some());
    }

    #[test]
    fn test_docs_url_lookup() {
        assert!(get_docs_url("F-1-2").is_some());
        assert!(get_docs_url("F-999-999").is_none());
    }

    #[test]
    fn test_nonexistent_code() {
        assert!(get_error_info("F-999-999").is_none());
    }
}
