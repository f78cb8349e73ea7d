use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JwtTokenType {
    Access,
    Refresh,
}

/// Claims carried by the backend's simplejwt tokens.
///
/// Only read on the client, never verified: the server stays the authority
/// on whether a token is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub token_type: Option<JwtTokenType>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
}

impl JwtClaims {
    /// Whether `exp` lies at or before `now` (unix seconds). Tokens without
    /// `exp` never expire client side.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}
