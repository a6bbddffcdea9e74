//! ID token parsing and claim validation
//!
//! The token arrives over the authenticated back channel, never from the
//! browser, so `parse` validates structure strictly and trust is then
//! established by the ordered claim checks: audience and nonce reject
//! cross-client and replayed tokens before any time-based check, so a forged
//! token cannot race the clock window.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;
use wl_types::{AppError, AppResult, Claims};

/// Accepted clock skew on `iat`, in seconds.
pub const CLOCK_SKEW_SECS: i64 = 5;

/// A structurally valid ID token.
#[derive(Debug, Clone)]
pub struct ParsedToken {
    /// Decoded claims
    pub payload: Claims,

    /// The compact token as received, for hook consumers
    pub raw: String,
}

/// Decode a compact JWT into its claims.
///
/// Rejects anything that is not three base64url segments with a JSON object
/// header carrying `alg` and a payload deserializing into [`Claims`].
pub fn parse_token(token: &str) -> AppResult<ParsedToken> {
    let mut segments = token.split('.');
    let (header, payload, signature) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => {
            return Err(AppError::TokenParse(
                "token is not a three-segment compact JWT".to_string(),
            ))
        }
    };

    if signature.is_empty() {
        return Err(AppError::TokenParse("token is unsigned".to_string()));
    }
    URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AppError::TokenParse("signature segment is not base64url".to_string()))?;

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AppError::TokenParse("header segment is not base64url".to_string()))?;
    let header: Value = serde_json::from_slice(&header)
        .map_err(|_| AppError::TokenParse("header is not JSON".to_string()))?;
    if header.get("alg").and_then(Value::as_str).is_none() {
        return Err(AppError::TokenParse("header is missing alg".to_string()));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AppError::TokenParse("payload segment is not base64url".to_string()))?;
    let payload: Claims = serde_json::from_slice(&payload)
        .map_err(|e| AppError::TokenParse(format!("payload does not parse: {}", e)))?;

    Ok(ParsedToken {
        payload,
        raw: token.to_string(),
    })
}

/// Why a token's claims were rejected. Each variant is a distinct HTTP 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    WrongAudience,
    WrongNonce,
    Expired,
    NotYetValid,
}

impl ClaimError {
    /// The user-visible diagnostic. Verbatim text, relied on by clients.
    pub fn message(&self) -> &'static str {
        match self {
            ClaimError::WrongAudience => "Wrong ID token audience.",
            ClaimError::WrongNonce => "Wrong nonce in ID token.",
            ClaimError::Expired => "The ID token has expired.",
            ClaimError::NotYetValid => "The ID token is not yet valid.",
        }
    }
}

/// The ordered, short-circuiting claim checks.
pub fn validate_claims(
    payload: &Claims,
    client_id: &str,
    nonce: &str,
    now: i64,
) -> Result<(), ClaimError> {
    if payload.aud != client_id {
        return Err(ClaimError::WrongAudience);
    }
    if payload.nonce != nonce {
        return Err(ClaimError::WrongNonce);
    }
    if payload.exp < now {
        return Err(ClaimError::Expired);
    }
    if payload.iat > now + CLOCK_SKEW_SECS {
        return Err(ClaimError::NotYetValid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn claims() -> Claims {
        Claims {
            sub: "sub_1".to_string(),
            aud: "client_abc".to_string(),
            nonce: "nonce_1".to_string(),
            iat: NOW - 10,
            exp: NOW + 300,
            scope: vec!["openid".to_string()],
            name: None,
            nickname: None,
            preferred_username: None,
            given_name: None,
            family_name: None,
            email: None,
            phone: None,
            picture: None,
        }
    }

    fn encode_token(header: &Value, payload: &Value) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).unwrap()),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap()),
            URL_SAFE_NO_PAD.encode(b"signature"),
        )
    }

    #[test]
    fn test_parse_round_trip() {
        let token = encode_token(
            &serde_json::json!({ "alg": "RS256", "typ": "JWT" }),
            &serde_json::to_value(claims()).unwrap(),
        );

        let parsed = parse_token(&token).unwrap();
        assert_eq!(parsed.payload, claims());
        assert_eq!(parsed.raw, token);
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        assert!(parse_token("onlyone").is_err());
        assert!(parse_token("a.b").is_err());
        assert!(parse_token("a.b.c.d").is_err());
    }

    #[test]
    fn test_parse_rejects_unsigned() {
        let token = format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims()).unwrap()),
        );
        assert!(parse_token(&token).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_alg() {
        let token = encode_token(
            &serde_json::json!({ "typ": "JWT" }),
            &serde_json::to_value(claims()).unwrap(),
        );
        assert!(parse_token(&token).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage_payload() {
        let token = format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#),
            "!!!not-base64!!!",
            URL_SAFE_NO_PAD.encode(b"sig"),
        );
        assert!(parse_token(&token).is_err());
    }

    #[test]
    fn test_validate_accepts_good_claims() {
        assert_eq!(
            validate_claims(&claims(), "client_abc", "nonce_1", NOW),
            Ok(())
        );
    }

    #[test]
    fn test_wrong_audience_checked_first() {
        // Even an expired token with a bad nonce reports the audience first
        let mut c = claims();
        c.aud = "other_client".to_string();
        c.nonce = "other_nonce".to_string();
        c.exp = NOW - 100;

        assert_eq!(
            validate_claims(&c, "client_abc", "nonce_1", NOW),
            Err(ClaimError::WrongAudience)
        );
    }

    #[test]
    fn test_wrong_nonce_checked_before_expiry() {
        let mut c = claims();
        c.nonce = "other_nonce".to_string();
        c.exp = NOW - 100;

        assert_eq!(
            validate_claims(&c, "client_abc", "nonce_1", NOW),
            Err(ClaimError::WrongNonce)
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let mut c = claims();

        c.exp = NOW - 1;
        assert_eq!(
            validate_claims(&c, "client_abc", "nonce_1", NOW),
            Err(ClaimError::Expired)
        );

        c.exp = NOW;
        assert_eq!(validate_claims(&c, "client_abc", "nonce_1", NOW), Ok(()));

        c.exp = NOW + 1;
        assert_eq!(validate_claims(&c, "client_abc", "nonce_1", NOW), Ok(()));
    }

    #[test]
    fn test_issuance_skew_boundary() {
        let mut c = claims();

        c.iat = NOW + CLOCK_SKEW_SECS;
        assert_eq!(validate_claims(&c, "client_abc", "nonce_1", NOW), Ok(()));

        c.iat = NOW + CLOCK_SKEW_SECS + 1;
        assert_eq!(
            validate_claims(&c, "client_abc", "nonce_1", NOW),
            Err(ClaimError::NotYetValid)
        );
    }

    #[test]
    fn test_claim_error_messages() {
        assert_eq!(
            ClaimError::WrongAudience.message(),
            "Wrong ID token audience."
        );
        assert_eq!(ClaimError::WrongNonce.message(), "Wrong nonce in ID token.");
        assert_eq!(ClaimError::Expired.message(), "The ID token has expired.");
        assert_eq!(
            ClaimError::NotYetValid.message(),
            "The ID token is not yet valid."
        );
    }
}
