use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

use super::types::JwtClaims;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token is not a three part JWT")]
    Malformed,
    #[error("Token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Token payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes the payload segment of a JWT without checking its signature.
///
/// Used to tell whether a stored session belongs to a user and when it
/// lapses; authorisation decisions are left to the backend.
pub fn peek_claims(token: &str) -> Result<JwtClaims, JwtError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(JwtError::Malformed),
    };

    // Some encoders keep the padding, base64url-no-pad rejects it.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authentication::types::JwtTokenType;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_peek_access_token_claims() {
        let token = token_with_payload(
            r#"{"token_type":"access","exp":1700000000,"iat":1699990000,"jti":"abc","user_id":42}"#,
        );

        let claims = peek_claims(&token).unwrap();

        assert_eq!(claims.user_id, Some(42));
        assert_eq!(claims.token_type, Some(JwtTokenType::Access));
        assert!(claims.is_expired_at(1700000000));
        assert!(!claims.is_expired_at(1699999999));
    }

    #[test]
    fn test_missing_claims_default_to_none() {
        let claims = peek_claims(&token_with_payload("{}")).unwrap();

        assert_eq!(claims.user_id, None);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(matches!(peek_claims("undefined"), Err(JwtError::Malformed)));
        assert!(matches!(peek_claims("a..c"), Err(JwtError::Malformed)));
        assert!(matches!(peek_claims("a.b.c.d"), Err(JwtError::Malformed)));
        assert!(matches!(peek_claims("a.!!!.c"), Err(JwtError::Base64(_))));
        assert!(matches!(
            peek_claims(&format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"))),
            Err(JwtError::Json(_))
        ));
    }
}
