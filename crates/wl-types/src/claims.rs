//! Identity token claims
//!
//! The provider grants claims by scope name: granting the `email` scope means
//! the ID token carries an `email` claim the application may read. The
//! [`SCOPE_CLAIM_TABLE`] makes that coupling explicit as a typed accessor
//! list instead of dynamic key lookup into the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a parsed ID token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject identifier issued by the provider
    pub sub: String,

    /// Audience, must equal the configured client_id
    pub aud: String,

    /// Nonce echoed from the login request, binds the token to one attempt
    pub nonce: String,

    /// Issued-at, seconds since epoch
    pub iat: i64,

    /// Expiry, seconds since epoch
    pub exp: i64,

    /// Scope names granted to this token
    #[serde(default)]
    pub scope: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

fn string_claim(value: &Option<String>) -> Option<Value> {
    value.as_ref().map(|v| Value::String(v.clone()))
}

/// Ordered (scope name, claim accessor) pairs.
///
/// A scope grants exactly the claim of the same name; scopes without a
/// matching accessor (e.g. `openid`) contribute nothing to the session.
pub const SCOPE_CLAIM_TABLE: &[(&str, fn(&Claims) -> Option<Value>)] = &[
    ("name", |c| string_claim(&c.name)),
    ("nickname", |c| string_claim(&c.nickname)),
    ("preferred_username", |c| string_claim(&c.preferred_username)),
    ("given_name", |c| string_claim(&c.given_name)),
    ("family_name", |c| string_claim(&c.family_name)),
    ("email", |c| string_claim(&c.email)),
    ("phone", |c| string_claim(&c.phone)),
    ("picture", |c| string_claim(&c.picture)),
];

impl Claims {
    /// Look up the claim granted by `scope`, if the token carries it.
    pub fn claim_for_scope(&self, scope: &str) -> Option<Value> {
        SCOPE_CLAIM_TABLE
            .iter()
            .find(|(name, _)| *name == scope)
            .and_then(|(_, accessor)| accessor(self))
    }
}
