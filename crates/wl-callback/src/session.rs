//! Session materialization and the signed session cookie
//!
//! The cookie IS the session: there is no server-side store. A session is
//! built from validated claims, optionally reshaped by the application login
//! hook, and sealed into the `weblogin_auth` cookie.

use tracing::debug;
use wl_oidc::{CookieCodec, ParsedToken};
use wl_types::{
    Auth, CallbackRequest, CallbackResponse, Claims, CookieOptions, LoginHook, LoginHookParams,
};

use crate::observer::AuthObserver;

/// Name of the signed session cookie.
pub const AUTH_COOKIE_NAME: &str = "weblogin_auth";

/// Build the session from validated claims.
///
/// Every scope named in the token copies its same-named claim into the
/// session when the token carries it; granted scopes with no claim value are
/// simply omitted.
pub fn materialize(payload: &Claims) -> Auth {
    let mut auth = Auth::logged_in(&payload.sub, payload.iat);
    for scope in &payload.scope {
        if let Some(value) = payload.claim_for_scope(scope) {
            auth.claims.insert(scope.clone(), value);
        }
    }
    auth
}

/// Run the application login hook against the materialized session.
///
/// The hook may deny access, replace the claim set, or override the target
/// URI. A hook error never aborts the flow: the pre-hook session survives
/// and the fault goes to the observer.
pub async fn run_login_hook(
    hook: &dyn LoginHook,
    parsed: &ParsedToken,
    auth: &mut Auth,
    target_uri: &mut String,
    req: &dyn CallbackRequest,
    res: &mut dyn CallbackResponse,
    observer: &dyn AuthObserver,
) {
    let params = LoginHookParams {
        token: &parsed.raw,
        payload: &parsed.payload,
        target_uri: target_uri.as_str(),
        request: req,
        response: res,
    };

    match hook.logged_in(params).await {
        Ok(outcome) => {
            if outcome.access_denied {
                observer.hook_declined(&parsed.payload.sub);
                *auth = Auth::not_logged_in();
            } else if let Some(updated) = outcome.updated_auth {
                // The hook supplies claims only; identity fields are always
                // re-stamped from the token.
                *auth = Auth {
                    is_logged_in: true,
                    sub: Some(parsed.payload.sub.clone()),
                    iat: Some(parsed.payload.iat),
                    claims: updated,
                };
            }
            if let Some(uri) = outcome.target_uri {
                *target_uri = uri;
            }
        }
        Err(e) => observer.hook_faulted(&e),
    }
}

/// Reads, writes and clears the signed session cookie.
pub struct SessionCookie {
    codec: CookieCodec,
}

impl SessionCookie {
    pub fn new(cookie_secret: &str) -> Self {
        Self {
            codec: CookieCodec::new(cookie_secret),
        }
    }

    /// Seal the session into a cookie string.
    pub fn seal(&self, auth: &Auth) -> wl_types::AppResult<String> {
        self.codec.seal(auth)
    }

    /// Write the session cookie on the response.
    pub fn save(
        &self,
        res: &mut dyn CallbackResponse,
        auth: &Auth,
        same_site_strict: bool,
    ) -> wl_types::AppResult<()> {
        let sealed = self.seal(auth)?;
        res.set_cookie(
            AUTH_COOKIE_NAME,
            &sealed,
            &CookieOptions::signed(same_site_strict, None),
        );
        Ok(())
    }

    /// Read the session from the request cookies.
    ///
    /// Absent or unverifiable cookies are the logged-out sentinel.
    pub fn read(&self, req: &dyn CallbackRequest) -> Auth {
        let Some(raw) = req.cookie(AUTH_COOKIE_NAME) else {
            return Auth::not_logged_in();
        };
        match self.codec.open(&raw) {
            Some(auth) => auth,
            None => {
                debug!("session cookie failed verification");
                Auth::not_logged_in()
            }
        }
    }

    /// Expire the session cookie (logout).
    pub fn clear(&self, res: &mut dyn CallbackResponse) {
        res.set_cookie(AUTH_COOKIE_NAME, "", &CookieOptions::expired());
    }
}
