//! Single-use OIDC state cookie
//!
//! Created at login initiation, consumed exactly once at the first callback.
//! Never persisted server-side: the signed cookie is the only copy. The
//! orchestrator clears it before the back-channel exchange so an
//! authorization code can never be replayed against stale state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wl_types::{AppResult, CallbackRequest, CallbackResponse, CookieOptions};

use crate::cookie::CookieCodec;

/// Name of the signed state cookie.
pub const OIDC_COOKIE_NAME: &str = "weblogin_oidc";

/// Maximum age of a state cookie before the login attempt is considered stale.
pub const STATE_LIFETIME_SECS: i64 = 300;

fn default_target_uri() -> String {
    "/".to_string()
}

/// Ephemeral per-login-attempt state, bound to the browser via the cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OidcState {
    /// PKCE proof secret generated at login
    pub code_verifier: String,

    /// Anti-replay token echoed in the ID token
    pub nonce: String,

    /// Redirect URI the authorization request was issued with
    pub redirect_uri: String,

    /// Final post-login destination
    #[serde(default = "default_target_uri")]
    pub target_uri: String,

    /// Creation time, seconds since epoch
    pub iat: i64,
}

/// Reads, writes and clears the signed state cookie.
pub struct StateStore {
    codec: CookieCodec,
}

impl StateStore {
    pub fn new(cookie_secret: &str) -> Self {
        Self {
            codec: CookieCodec::new(cookie_secret),
        }
    }

    /// Sign a state value into a cookie string.
    ///
    /// Exposed separately from [`save`](Self::save) so tests and adapters can
    /// fabricate request cookies.
    pub fn seal(&self, state: &OidcState) -> AppResult<String> {
        self.codec.seal(state)
    }

    /// Write the state cookie on the response.
    pub fn save(
        &self,
        res: &mut dyn CallbackResponse,
        state: &OidcState,
        same_site_strict: bool,
    ) -> AppResult<()> {
        let sealed = self.seal(state)?;
        res.set_cookie(
            OIDC_COOKIE_NAME,
            &sealed,
            &CookieOptions::signed(same_site_strict, Some(STATE_LIFETIME_SECS)),
        );
        Ok(())
    }

    /// Read and validate the state cookie.
    ///
    /// Missing, corrupt or expired state is `None` — a fatal condition for
    /// the callback, not a retryable one. A cookie that fails validation is
    /// cleared on the response so the browser does not present it again.
    pub fn get(
        &self,
        req: &dyn CallbackRequest,
        res: &mut dyn CallbackResponse,
    ) -> Option<OidcState> {
        let raw = req.cookie(OIDC_COOKIE_NAME)?;

        let state: Option<OidcState> = self.codec.open(&raw);
        let state = match state {
            Some(s) => s,
            None => {
                debug!("state cookie failed verification");
                self.clear(res);
                return None;
            }
        };

        if Utc::now().timestamp() - state.iat > STATE_LIFETIME_SECS {
            debug!("state cookie expired");
            self.clear(res);
            return None;
        }

        Some(state)
    }

    /// Expire the state cookie. Idempotent.
    pub fn clear(&self, res: &mut dyn CallbackResponse) {
        res.set_cookie(OIDC_COOKIE_NAME, "", &CookieOptions::expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeRequest {
        cookies: HashMap<String, String>,
    }

    impl CallbackRequest for FakeRequest {
        fn query_pairs(&self) -> Vec<(String, String)> {
            Vec::new()
        }
        fn cookie(&self, name: &str) -> Option<String> {
            self.cookies.get(name).cloned()
        }
        fn header(&self, _name: &str) -> Option<String> {
            None
        }
    }

    #[derive(Default)]
    struct FakeResponse {
        cookies: Vec<(String, String, CookieOptions)>,
    }

    impl CallbackResponse for FakeResponse {
        fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) {
            self.cookies
                .push((name.to_string(), value.to_string(), options.clone()));
        }
        fn set_header(&mut self, _name: &str, _value: &str) {}
        fn html(&mut self, _body: &str) {}
        fn json(&mut self, _body: &serde_json::Value) {}
        fn redirect(&mut self, _url: &str) {}
        fn respond(&mut self, _status: u16, _body: &str) {}
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn fresh_state() -> OidcState {
        OidcState {
            code_verifier: "verifier".to_string(),
            nonce: "nonce_1".to_string(),
            redirect_uri: "https://app.example/api/weblogin".to_string(),
            target_uri: "/dashboard".to_string(),
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_save_then_get() {
        let store = StateStore::new(SECRET);
        let state = fresh_state();

        let sealed = store.seal(&state).unwrap();
        let req = FakeRequest {
            cookies: HashMap::from([(OIDC_COOKIE_NAME.to_string(), sealed)]),
        };
        let mut res = FakeResponse::default();

        assert_eq!(store.get(&req, &mut res), Some(state));
        // A valid read does not touch the cookie
        assert!(res.cookies.is_empty());
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let store = StateStore::new(SECRET);
        let req = FakeRequest {
            cookies: HashMap::new(),
        };
        let mut res = FakeResponse::default();
        assert_eq!(store.get(&req, &mut res), None);
    }

    #[test]
    fn test_corrupt_cookie_cleared() {
        let store = StateStore::new(SECRET);
        let req = FakeRequest {
            cookies: HashMap::from([(OIDC_COOKIE_NAME.to_string(), "garbage".to_string())]),
        };
        let mut res = FakeResponse::default();

        assert_eq!(store.get(&req, &mut res), None);
        assert_eq!(res.cookies.len(), 1);
        assert_eq!(res.cookies[0].2.max_age, Some(0));
    }

    #[test]
    fn test_expired_state_rejected() {
        let store = StateStore::new(SECRET);
        let mut state = fresh_state();
        state.iat = Utc::now().timestamp() - STATE_LIFETIME_SECS - 1;

        let sealed = store.seal(&state).unwrap();
        let req = FakeRequest {
            cookies: HashMap::from([(OIDC_COOKIE_NAME.to_string(), sealed)]),
        };
        let mut res = FakeResponse::default();

        assert_eq!(store.get(&req, &mut res), None);
    }

    #[test]
    fn test_target_uri_defaults_to_root() {
        let store = StateStore::new(SECRET);
        let sealed = store
            .codec
            .seal(&serde_json::json!({
                "code_verifier": "v",
                "nonce": "n",
                "redirect_uri": "https://app.example/cb",
                "iat": Utc::now().timestamp(),
            }))
            .unwrap();

        let req = FakeRequest {
            cookies: HashMap::from([(OIDC_COOKIE_NAME.to_string(), sealed)]),
        };
        let mut res = FakeResponse::default();

        let state = store.get(&req, &mut res).unwrap();
        assert_eq!(state.target_uri, "/");
    }
}
