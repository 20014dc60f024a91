use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::error::{LocalizableError, TransformError};

/// Response header map. BTreeMap keeps serialized header order stable.
pub type Headers = BTreeMap<String, String>;

/// The `error` object of a failure response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub params: Vec<Value>,
}

/// A response shaped exactly like one from a remote REST rendering service,
/// so callers cannot tell whether the transform ran locally or remotely.
///
/// Wire shape: `{code, headers, body}` on success, `{error: {message,
/// params}, headers, body}` on failure. `code` and `error` are mutually
/// exclusive by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success {
        code: u16,
        headers: Headers,
        body: String,
    },
    Failure {
        error: ErrorBody,
        headers: Headers,
        body: String,
    },
}

impl ResponseEnvelope {
    /// Successful page render: raw HTML plus the headers an interactive
    /// editor needs to re-request or round-trip the same render.
    pub fn rendered_html(
        body: impl Into<String>,
        content_language: impl Into<String>,
        etag: impl Into<String>,
    ) -> Self {
        let mut headers = Headers::new();
        headers.insert("content-language".to_string(), content_language.into());
        headers.insert("etag".to_string(), etag.into());
        ResponseEnvelope::Success {
            code: 200,
            headers,
            body: body.into(),
        }
    }

    /// Successful HTML-to-wikitext transform, serialized in `format`.
    pub fn serialized_content(format: impl Into<String>, body: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), format.into());
        ResponseEnvelope::Success {
            code: 200,
            headers,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            ResponseEnvelope::Success { code, .. } => Some(*code),
            ResponseEnvelope::Failure { .. } => None,
        }
    }

    pub fn headers(&self) -> &Headers {
        match self {
            ResponseEnvelope::Success { headers, .. } => headers,
            ResponseEnvelope::Failure { headers, .. } => headers,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            ResponseEnvelope::Success { body, .. } => body,
            ResponseEnvelope::Failure { body, .. } => body,
        }
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failure { error, .. } => Some(error),
        }
    }
}

impl From<TransformError> for ResponseEnvelope {
    /// Map a collaborator failure to the remote error shape. Localized
    /// errors expose their key and parameters; raw text gets an empty key
    /// and no parameters, with the text itself only in the body.
    fn from(err: TransformError) -> Self {
        let body = err.message.display_text();
        let error = match err.message {
            LocalizableError::Localized { key, params } => ErrorBody {
                message: key,
                params,
            },
            LocalizableError::Raw(_) => ErrorBody {
                message: String::new(),
                params: vec![],
            },
        };
        ResponseEnvelope::Failure {
            error,
            headers: Headers::new(),
            body,
        }
    }
}
