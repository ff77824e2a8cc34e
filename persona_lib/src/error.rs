//! Error types for the library layer.

use std::fmt;

use persona_api::types::PersonaID;

use crate::validation::ValidationErrors;

/// Message shown when nothing better can be extracted from a failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding lookup and input validation failures.
#[derive(Debug)]
pub enum DirectoryError {
    /// An error from the underlying API client.
    Api(persona_api::Error),
    /// The record does not exist or has been soft-deleted.
    NotFound(PersonaID),
    /// The person form failed local validation.
    Validation(ValidationErrors),
    /// User-provided input (ids, page numbers) failed validation.
    InvalidInput(String),
}

impl DirectoryError {
    /// Best-effort human-readable message for the error notice.
    ///
    /// Prefers the `error` field of a JSON response body, then any plain
    /// message the server or transport produced, then a generic fallback.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api(persona_api::Error::HttpStatus { status, body }) => {
                message_from_body(body).unwrap_or_else(|| format!("Request failed with status {}", status))
            }
            Self::Api(persona_api::Error::RequestFailed(msg)) => msg.trim().to_string(),
            Self::Api(persona_api::Error::Parse(_)) => String::new(),
            Self::NotFound(id) => format!("Person {} was not found", id),
            Self::Validation(errors) => errors.to_string(),
            Self::InvalidInput(msg) => msg.clone(),
        };
        if message.is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// True for failures worth retrying on a read: transport errors,
    /// throttling and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(persona_api::Error::RequestFailed(_)) => true,
            Self::Api(persona_api::Error::HttpStatus { status, .. }) => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}

fn message_from_body(body: &str) -> Option<String> {
    const MAX_PLAIN: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("error")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Ok(_) => None,
        // Plain-text bodies are shown as-is when short; HTML error pages are not.
        Err(_) if trimmed.len() <= MAX_PLAIN && !trimmed.starts_with('<') => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::NotFound(id) => write!(f, "Person {} not found", id),
            Self::Validation(errors) => write!(f, "Validation failed: {}", errors),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<persona_api::Error> for DirectoryError {
    fn from(e: persona_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ValidationErrors> for DirectoryError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> DirectoryError {
        DirectoryError::Api(persona_api::Error::HttpStatus {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn message_from_json_error_field() {
        let err = http(400, r#"{"error":"El email ya existe"}"#);
        assert_eq!(err.user_message(), "El email ya existe");
    }

    #[test]
    fn message_from_plain_text_body() {
        assert_eq!(http(409, "Duplicate email").user_message(), "Duplicate email");
    }

    #[test]
    fn message_ignores_html_body() {
        let err = http(502, "<html><body>Bad Gateway</body></html>");
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn message_from_json_without_error_field() {
        let err = http(500, r#"{"title":"boom"}"#);
        assert_eq!(err.user_message(), "Request failed with status 500");
    }

    #[test]
    fn message_from_transport_error() {
        let err = DirectoryError::Api(persona_api::Error::RequestFailed(
            "connection refused".to_string(),
        ));
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn message_falls_back_to_generic() {
        let err = DirectoryError::Api(persona_api::Error::RequestFailed(String::new()));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        let err = DirectoryError::Api(persona_api::Error::Parse("eof".to_string()));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn transient_classification() {
        assert!(http(500, "").is_transient());
        assert!(http(503, "").is_transient());
        assert!(http(429, "").is_transient());
        assert!(!http(404, "").is_transient());
        assert!(!http(400, "").is_transient());
        assert!(!DirectoryError::NotFound(3).is_transient());
        assert!(DirectoryError::Api(persona_api::Error::RequestFailed("x".into())).is_transient());
    }
}
