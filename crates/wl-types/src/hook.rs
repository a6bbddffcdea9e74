//! Application login hook
//!
//! Invoked after claim validation with the parsed token. The hook may deny
//! access, replace the session claims, or redirect the user elsewhere. A
//! hook that returns `Err` never aborts the request: the session computed
//! before the hook call is committed unchanged.

use crate::claims::Claims;
use crate::errors::AppResult;
use crate::http::{CallbackRequest, CallbackResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Arguments handed to [`LoginHook::logged_in`].
pub struct LoginHookParams<'a> {
    /// The raw compact ID token
    pub token: &'a str,

    /// Validated claims
    pub payload: &'a Claims,

    /// Post-login destination as currently resolved
    pub target_uri: &'a str,

    pub request: &'a dyn CallbackRequest,

    pub response: &'a mut dyn CallbackResponse,
}

/// What the hook decided.
#[derive(Debug, Default)]
pub struct LoginHookOutcome {
    /// Replace the session with the "not logged in" sentinel
    pub access_denied: bool,

    /// Replacement claim set; `is_logged_in`, `sub` and `iat` are re-stamped
    /// from the token regardless of what this map contains
    pub updated_auth: Option<BTreeMap<String, Value>>,

    /// Override the post-login destination
    pub target_uri: Option<String>,
}

#[async_trait]
pub trait LoginHook: Send + Sync {
    async fn logged_in(&self, params: LoginHookParams<'_>) -> AppResult<LoginHookOutcome>;
}
