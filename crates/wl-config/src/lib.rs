//! Configuration for the weblogin SDK
//!
//! A [`LoginConfig`] is an explicit value handed to the orchestrator
//! constructor. There is no process-global configuration.

use std::fmt;
use std::sync::Arc;

use wl_types::{AppError, AppResult, LoginHook};

/// Default scopes requested at login when none are configured.
pub const DEFAULT_SCOPES: &[&str] = &["openid", "name", "email", "picture"];

/// Application routes the callback may hand control to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routes {
    /// Absolute URL to redirect provider-reported errors to. When unset, an
    /// inline error page is rendered instead.
    pub error: Option<String>,

    /// Path of the SDK API route, used as the base of the wildcard-domain
    /// confirmation URL.
    pub api: String,
}

/// Configuration for login initiation and callback handling.
#[derive(Clone)]
pub struct LoginConfig {
    /// Client identifier registered with the identity provider
    pub client_id: String,

    /// Scopes requested at login
    pub scopes: Vec<String>,

    /// Provider hints forwarded in the authorization request
    pub provider_hint: Vec<String>,

    /// Application routes
    pub routes: Routes,

    /// Issue cookies with SameSite=Strict instead of Lax
    pub same_site_strict: bool,

    /// HMAC key material for the signed state and session cookies
    pub cookie_secret: String,

    /// Provider authorization endpoint
    pub authorization_endpoint: String,

    /// Provider token endpoint
    pub token_endpoint: String,

    /// Redirect URI registered for this client
    pub redirect_uri: String,

    /// Optional application hook invoked after claim validation
    pub login_hook: Option<Arc<dyn LoginHook>>,
}

impl LoginConfig {
    /// A config with the defaults filled in; endpoint and secret fields
    /// still need to be set before [`validate`](Self::validate) passes.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            provider_hint: Vec::new(),
            routes: Routes {
                error: None,
                api: "/api/weblogin".to_string(),
            },
            same_site_strict: false,
            cookie_secret: String::new(),
            authorization_endpoint: String::new(),
            token_endpoint: String::new(),
            redirect_uri: String::new(),
            login_hook: None,
        }
    }

    /// Reject configs that cannot complete a callback.
    pub fn validate(&self) -> AppResult<()> {
        if self.client_id.is_empty() {
            return Err(AppError::Config("client_id is required".to_string()));
        }
        if self.cookie_secret.len() < 32 {
            return Err(AppError::Config(
                "cookie_secret must be at least 32 bytes".to_string(),
            ));
        }
        if self.token_endpoint.is_empty() {
            return Err(AppError::Config("token_endpoint is required".to_string()));
        }
        if self.authorization_endpoint.is_empty() {
            return Err(AppError::Config(
                "authorization_endpoint is required".to_string(),
            ));
        }
        if self.redirect_uri.is_empty() {
            return Err(AppError::Config("redirect_uri is required".to_string()));
        }
        if self.routes.api.is_empty() {
            return Err(AppError::Config("routes.api is required".to_string()));
        }
        if !self.scopes.iter().any(|s| s == "openid") {
            tracing::warn!("scope list does not include openid");
        }
        Ok(())
    }
}

impl fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginConfig")
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("provider_hint", &self.provider_hint)
            .field("routes", &self.routes)
            .field("same_site_strict", &self.same_site_strict)
            .field("cookie_secret", &"<redacted>")
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("redirect_uri", &self.redirect_uri)
            .field("login_hook", &self.login_hook.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
