//! Error types for the chromap library.
//!
//! This module defines a comprehensive error enum that covers all possible
//! error conditions in the library: color parsing, stop ordering, catalog
//! resolution, and catalog record loading.

use thiserror::Error;

/// The main error type for chromap operations.
#[derive(Error, Debug)]
pub enum ChromapError {
    /// A string matched none of the known color representations
    /// (name, hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`).
    #[error("Invalid color string: {value:?}")]
    InvalidColor { value: String },

    /// A value had no defined conversion path to a color or to color stops.
    #[error("Unsupported color input: {message}")]
    UnsupportedInput { message: String },

    /// Explicit color-stop positions were not monotonically non-decreasing.
    #[error("Color stops must be in ascending position order")]
    StopOrder,

    /// A catalog name did not resolve to any entry, even after normalization.
    #[error("Colormap {name:?} (normalized to {normalized:?}) not found")]
    NotFound { name: String, normalized: String },

    /// A catalog record document was malformed.
    #[error("Invalid catalog record: {message}")]
    Record { message: String },

    /// IO errors while reading record files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with ChromapError
pub type Result<T> = std::result::Result<T, ChromapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_input() {
        let err = ChromapError::InvalidColor {
            value: "seven".to_string(),
        };
        assert!(err.to_string().contains("seven"));

        let err = ChromapError::NotFound {
            name: "Royal Map".to_string(),
            normalized: "royal_map".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Royal Map"));
        assert!(msg.contains("royal_map"));
    }
}
