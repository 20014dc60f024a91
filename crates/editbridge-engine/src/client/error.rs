use serde_json::Value;
use thiserror::Error;

/// A message that may or may not carry a localization key.
///
/// Rendering and transform collaborators report failures either as a
/// localizable message (key plus ordered parameters, resolved by the host
/// wiki's message system) or as plain text when no localization exists.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalizableError {
    Localized { key: String, params: Vec<Value> },
    Raw(String),
}

impl LocalizableError {
    /// Best-effort displayable text, used as the response body.
    pub fn display_text(&self) -> String {
        match self {
            LocalizableError::Localized { key, params } => {
                if params.is_empty() {
                    key.clone()
                } else {
                    let rendered: Vec<String> = params.iter().map(param_text).collect();
                    format!("{}: {}", key, rendered.join(", "))
                }
            }
            LocalizableError::Raw(text) => text.clone(),
        }
    }
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Transport-style failure reported by a rendering or transform collaborator.
///
/// Carries an HTTP-like status code and a [`LocalizableError`]. Collaborators
/// return these through `Result`; the client maps them into a failure
/// envelope and they never escape its public operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("transform failed with status {status}: {}", .message.display_text())]
pub struct TransformError {
    pub status: u16,
    pub message: LocalizableError,
}

impl TransformError {
    pub fn localized(status: u16, key: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            status,
            message: LocalizableError::Localized {
                key: key.into(),
                params,
            },
        }
    }

    pub fn raw(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            message: LocalizableError::Raw(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_localized_display_text_without_params() {
        let err = TransformError::localized(404, "rest-nonexistent-title", vec![]);
        assert_eq!(err.message.display_text(), "rest-nonexistent-title");
    }

    #[test]
    fn test_localized_display_text_with_params() {
        let err = TransformError::localized(
            400,
            "rest-html-backend-error",
            vec![json!("Main_Page"), json!(42)],
        );
        assert_eq!(
            err.message.display_text(),
            "rest-html-backend-error: Main_Page, 42"
        );
    }

    #[test]
    fn test_raw_display_text() {
        let err = TransformError::raw(500, "backend exploded");
        assert_eq!(err.message.display_text(), "backend exploded");
        assert_eq!(err.to_string(), "transform failed with status 500: backend exploded");
    }
}
