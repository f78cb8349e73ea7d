use std::fmt;

use serde::{Deserialize, Serialize};

pub type AccessToken = String;
pub type RefreshToken = String;

/// The `{access, refresh}` credentials of one signed-in session.
///
/// Always written and replaced as a whole; a refresh never updates one half
/// in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh: RefreshToken,
}

impl TokenPair {
    pub fn new(access: impl Into<AccessToken>, refresh: impl Into<RefreshToken>) -> Self {
        Self { access: access.into(), refresh: refresh.into() }
    }
}

// Tokens are bearer credentials, keep them out of logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialises_with_backend_field_names() {
        let pair = TokenPair::new("a.b.c", "d.e.f");

        let json = serde_json::to_value(&pair).unwrap();

        assert_eq!(json, serde_json::json!({ "access": "a.b.c", "refresh": "d.e.f" }));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug = format!("{:?}", TokenPair::new("secret-access", "secret-refresh"));

        assert!(!debug.contains("secret"));
    }
}
