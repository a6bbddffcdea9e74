//! Signed cookie codec
//!
//! Cookie values are `base64url(json) . base64url(hmac_sha256_tag)`. The tag
//! is computed over the encoded payload, and verification is constant-time
//! via `ring::hmac::verify`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::hmac;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use wl_types::AppResult;

/// Seals and opens signed cookie values with one HMAC-SHA256 key.
pub struct CookieCodec {
    key: hmac::Key,
}

impl CookieCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
        }
    }

    /// Serialize and sign a value into a cookie string.
    pub fn seal<T: Serialize>(&self, value: &T) -> AppResult<String> {
        let json = serde_json::to_vec(value)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        Ok(format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(tag.as_ref())))
    }

    /// Verify and deserialize a cookie string.
    ///
    /// Any failure (shape, signature, JSON) yields `None`: a cookie that does
    /// not verify carries no information worth distinguishing.
    pub fn open<T: DeserializeOwned>(&self, sealed: &str) -> Option<T> {
        let (payload, tag) = sealed.split_once('.')?;

        let tag = URL_SAFE_NO_PAD.decode(tag).ok()?;
        if hmac::verify(&self.key, payload.as_bytes(), &tag).is_err() {
            debug!("cookie signature verification failed");
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        nonce: String,
        iat: i64,
    }

    fn codec() -> CookieCodec {
        CookieCodec::new("0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn test_seal_open_round_trip() {
        let value = Payload {
            nonce: "abc".to_string(),
            iat: 1_700_000_000,
        };

        let sealed = codec().seal(&value).unwrap();
        let opened: Payload = codec().open(&sealed).unwrap();
        assert_eq!(opened, value);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let value = Payload {
            nonce: "abc".to_string(),
            iat: 1,
        };
        let sealed = codec().seal(&value).unwrap();

        // Flip a character in the payload half
        let mut chars: Vec<char> = sealed.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert!(codec().open::<Payload>(&tampered).is_none());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let value = Payload {
            nonce: "abc".to_string(),
            iat: 1,
        };
        let sealed = codec().seal(&value).unwrap();

        let other = CookieCodec::new("ffffffffffffffffffffffffffffffff");
        assert!(other.open::<Payload>(&sealed).is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(codec().open::<Payload>("not-a-cookie").is_none());
        assert!(codec().open::<Payload>("a.b").is_none());
        assert!(codec().open::<Payload>("").is_none());
    }
}
