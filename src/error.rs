//! Structured error types for the folio engine.
//!
//! Document-level failures ([`FolioError`]) abort a generation run. Node-level
//! failures ([`NodeError`]) are recovered by the layout engine, which logs
//! them and draws a placeholder in the node's place.

use thiserror::Error;

/// The unified error type returned by all public folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a valid folio document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The document parsed, but its values violate a model invariant
    /// (negative margins, empty content area, non-positive font size...).
    #[error("Invalid document: {0}")]
    Validation(String),
    /// The rendering backend failed irrecoverably. No artifact is produced.
    #[error("Backend error: {0}")]
    Backend(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check field names, enum values and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

/// A failure confined to a single content node.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NodeError {
    /// The image source could not be read.
    #[error("image source unreachable: {0}")]
    ImageUnreachable(String),
    /// The image bytes were read but could not be decoded.
    #[error("image could not be decoded: {0}")]
    ImageDecode(String),
    /// The node asked for something the backend cannot draw.
    #[error("{0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{\"a\": }")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn backend_error_message() {
        let err = FolioError::Backend("page 4 does not exist".to_string());
        assert_eq!(err.to_string(), "Backend error: page 4 does not exist");
    }
}
