use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Shown when the server gave us nothing readable
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown for transport failures
const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Check your connection.";

/// JSON keys that carry a single human-readable message, in priority order
const MESSAGE_KEYS: [&str; 3] = ["error", "detail", "message"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..end],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            400 | 422 => ApiError::Validation(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// The text to show the user for this error.
    ///
    /// Server-supplied messages are passed through verbatim; transport
    /// failures and empty bodies fall back to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::InvalidResponse(_) => GENERIC_ERROR_MESSAGE.to_string(),
            ApiError::Unauthorized(msg)
            | ApiError::Validation(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServerError(msg)
            | ApiError::RefreshFailed(msg) => {
                if msg.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    msg.clone()
                }
            }
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": "..."}`, `{"detail": "..."}`, `{"message": "..."}`,
/// `{"non_field_errors": ["..."]}` and field error maps such as
/// `{"emotion_type": ["Invalid pk"]}`. Returns `None` for anything else.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in MESSAGE_KEYS {
        if let Some(text) = object.get(key).and_then(first_text) {
            return Some(text);
        }
    }

    if let Some(text) = object.get("non_field_errors").and_then(first_text) {
        return Some(text);
    }

    object.iter().find_map(|(field, v)| {
        first_text(v).map(|text| format!("{}: {}", field, text))
    })
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
