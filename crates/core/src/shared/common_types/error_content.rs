use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const TOKEN_EXPIRED_MESSAGE: &str = "Token is expired";
const TOKEN_INVALID_MESSAGE: &str = "Token is invalid";

/// Why the backend rejected a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailure {
    /// The access token is past its lifetime; a refresh may recover.
    Expired,
    /// The token is malformed, blacklisted or signed with another key.
    Invalid,
}

/// Parsed JSON body of a failed response.
///
/// The backend returns several shapes: field validation maps
/// (`{"phone_number": ["..."]}`), `{"detail": "..."}`, `{"error": "..."}` and,
/// for token failures, `{"detail", "code", "messages": [{"message": ...}]}`.
/// The body is kept as-is so callers can render field errors; the accessors
/// cover the common lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorContent(Value);

impl ErrorContent {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// Body used when the server answered with something that is not JSON.
    pub fn invalid_json() -> Self {
        Self(json!({ "message": "Invalid JSON response from server." }))
    }

    /// Body used for every 404, whatever the server sent.
    pub fn page_not_found() -> Self {
        Self(json!({ "detail": "page not found." }))
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    /// `messages[0].message`, the field token errors are reported in.
    pub fn first_message(&self) -> Option<&str> {
        self.0.get("messages")?.get(0)?.get("message")?.as_str()
    }

    pub fn detail(&self) -> Option<&str> {
        self.0.get("detail")?.as_str()
    }

    pub fn code(&self) -> Option<&str> {
        self.0.get("code")?.as_str()
    }

    /// `error`, used by the login endpoint for bad credentials.
    pub fn error(&self) -> Option<&str> {
        self.0.get("error")?.as_str()
    }

    /// Error strings reported against a form field, e.g. `phone_number`.
    pub fn field_errors(&self, field: &str) -> Vec<&str> {
        match self.0.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(message)) => vec![message.as_str()],
            _ => Vec::new(),
        }
    }

    /// Classifies a 401 body by its first message.
    ///
    /// Only the two exact messages count; anything else is an ordinary
    /// failure that is handed back to the caller.
    pub fn token_failure(&self) -> Option<TokenFailure> {
        match self.first_message()? {
            TOKEN_EXPIRED_MESSAGE => Some(TokenFailure::Expired),
            TOKEN_INVALID_MESSAGE => Some(TokenFailure::Invalid),
            _ => None,
        }
    }

    /// Best single line for showing to a user.
    pub fn summary(&self) -> String {
        self.first_message()
            .or_else(|| self.detail())
            .or_else(|| self.error())
            .or_else(|| self.0.get("message").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl From<Value> for ErrorContent {
    fn from(body: Value) -> Self {
        Self(body)
    }
}

impl fmt::Display for ErrorContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_body(message: &str) -> ErrorContent {
        ErrorContent::new(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid",
            "messages": [
                { "token_class": "AccessToken", "token_type": "access", "message": message }
            ]
        }))
    }

    #[test]
    fn test_token_failure_classification() {
        assert_eq!(token_body("Token is expired").token_failure(), Some(TokenFailure::Expired));
        assert_eq!(token_body("Token is invalid").token_failure(), Some(TokenFailure::Invalid));
        assert_eq!(token_body("Token is blacklisted").token_failure(), None);
        assert_eq!(ErrorContent::new(json!({ "detail": "nope" })).token_failure(), None);
        assert_eq!(ErrorContent::new(json!({ "messages": [] })).token_failure(), None);
    }

    #[test]
    fn test_field_errors() {
        let content = ErrorContent::new(json!({
            "phone_number": ["This field is required.", "Enter a valid number."],
            "password": "Too short"
        }));

        assert_eq!(content.field_errors("phone_number").len(), 2);
        assert_eq!(content.field_errors("password"), vec!["Too short"]);
        assert!(content.field_errors("code").is_empty());
    }

    #[test]
    fn test_summary_prefers_token_message() {
        assert_eq!(token_body("Token is expired").summary(), "Token is expired");
        assert_eq!(ErrorContent::page_not_found().summary(), "page not found.");
        assert_eq!(
            ErrorContent::new(json!({ "error": "invalid username or password!" })).to_string(),
            "invalid username or password!"
        );
    }
}
