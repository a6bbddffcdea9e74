//! PKCE (RFC 7636) and nonce generation
//!
//! S256 only: the challenge is BASE64URL(SHA256(code_verifier)).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

/// Verifier length; RFC 7636 allows 43-128 characters.
const VERIFIER_LEN: usize = 64;

/// Nonce length in characters.
const NONCE_LEN: usize = 32;

/// PKCE verifier/challenge pair for one login attempt.
#[derive(Debug, Clone)]
pub struct PkceMaterial {
    /// Proof secret, stored in the state cookie and sent at token exchange
    pub code_verifier: String,

    /// BASE64URL(SHA256(code_verifier)), sent in the authorization request
    pub code_challenge: String,
}

/// Random string over the RFC 7636 unreserved alphanumerics.
fn random_urlsafe(len: usize) -> String {
    let mut rng = thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..62);
            match idx {
                0..=25 => (b'A' + idx) as char,
                26..=51 => (b'a' + (idx - 26)) as char,
                _ => (b'0' + (idx - 52)) as char,
            }
        })
        .collect()
}

/// Generate the PKCE material for a login attempt.
pub fn generate_pkce() -> PkceMaterial {
    let code_verifier = random_urlsafe(VERIFIER_LEN);

    let mut hasher = Sha256::new();
    hasher.update(code_verifier.as_bytes());
    let code_challenge = URL_SAFE_NO_PAD.encode(hasher.finalize());

    PkceMaterial {
        code_verifier,
        code_challenge,
    }
}

/// Generate the nonce binding the ID token to this login attempt.
pub fn generate_nonce() -> String {
    random_urlsafe(NONCE_LEN)
}
