//! Authenticated session value
//!
//! There is no server-side session store: the signed session cookie IS the
//! session, and this is the value it carries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Session established after a validated login, or the logged-out sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Auth {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,

    /// Subject from the ID token; absent when logged out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued-at from the ID token; absent when logged out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Claim values copied from the token, one per granted scope.
    /// Flattened, so an empty map serializes to nothing.
    #[serde(flatten)]
    pub claims: BTreeMap<String, Value>,
}

impl Auth {
    /// The "not logged in" sentinel, also used when a hook denies access.
    pub fn not_logged_in() -> Self {
        Self {
            is_logged_in: false,
            sub: None,
            iat: None,
            claims: BTreeMap::new(),
        }
    }

    /// A fresh logged-in session carrying no scoped claims yet.
    pub fn logged_in(sub: impl Into<String>, iat: i64) -> Self {
        Self {
            is_logged_in: true,
            sub: Some(sub.into()),
            iat: Some(iat),
            claims: BTreeMap::new(),
        }
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self::not_logged_in()
    }
}
