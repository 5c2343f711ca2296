//! Client-side inspection of bearer tokens.
//!
//! The token is opaque apart from its claims segment: the middle part of a
//! `header.claims.signature` credential, base64url-encoded JSON with a numeric
//! `exp` (seconds since the Unix epoch). The signature is never checked here;
//! the services do that.

use super::errors::{AuthError, AuthResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims the client reads from a token
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiration (seconds since epoch, may be fractional)
    pub exp: f64,
    /// Issued-at, when present
    #[serde(default)]
    pub iat: Option<f64>,
}

impl TokenClaims {
    /// Expiration in milliseconds since epoch
    pub fn expires_at_ms(&self) -> i64 {
        (self.exp * 1000.0) as i64
    }

    /// Whether the token is still valid at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() < self.expires_at_ms()
    }
}

/// Decode the claims segment of `token`
///
/// # Errors
///
/// * `AuthError::MalformedToken` - Not three segments, bad base64url, bad JSON, or no numeric `exp`
pub fn decode_claims(token: &str) -> AuthResult<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, claims, _] = segments.as_slice() else {
        return Err(AuthError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(claims.trim_end_matches('='))
        .map_err(|_| AuthError::MalformedToken)?;

    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

/// Whether `token` decodes and has not expired at `now`; fails closed
pub fn is_token_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.is_valid_at(now),
        Err(_) => {
            log::debug!("Token claims could not be decoded; treating as expired");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use chrono::TimeZone;

    fn token_with_claims(claims: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn test_decode_claims_reads_exp() {
        let token = token_with_claims(r#"{"sub":"joao","tipo":"aluno","exp":1700000000,"iat":1699990000}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, 1_700_000_000.0);
        assert_eq!(claims.iat, Some(1_699_990_000.0));
        assert_eq!(claims.expires_at_ms(), 1_700_000_000_000);
    }

    #[test]
    fn test_decode_claims_accepts_padded_segment() {
        let claims = URL_SAFE.encode(r#"{"exp":1700000000}"#);
        let token = format!("h.{claims}.s");
        assert!(decode_claims(&token).is_ok());
    }

    #[test]
    fn test_malformed_tokens_fail_closed() {
        let now = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let tokens = vec![
            String::new(),
            "only-one-segment".to_string(),
            "two.segments".to_string(),
            "a.b.c.d".to_string(),
            "h.%%%notbase64.s".to_string(),
            token_with_claims("not json"),
            token_with_claims(r#"{"sub":"joao"}"#),
            token_with_claims(r#"{"exp":"tomorrow"}"#),
        ];
        for token in &tokens {
            let token = token.as_str();
            assert!(matches!(decode_claims(token), Err(AuthError::MalformedToken)), "{token}");
            assert!(!is_token_valid_at(token, now), "{token}");
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let token = token_with_claims(r#"{"exp":1700000000}"#);
        let before = Utc.timestamp_opt(1_699_999_999, 0).unwrap();
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let after = Utc.timestamp_opt(1_700_000_001, 0).unwrap();

        assert!(is_token_valid_at(&token, before));
        assert!(!is_token_valid_at(&token, at));
        assert!(!is_token_valid_at(&token, after));
    }
}
