//! Callback orchestration
//!
//! Drives one authorization-code callback through its states:
//! same-site bounce → state lookup → error branch / code validation →
//! token exchange → claim validation → session materialization →
//! wildcard prompt → committed.
//!
//! Exactly one terminal outcome is written per request: the bounce page, an
//! HTTP 400 with fixed text, an error page or redirect, an HTTP 500 with the
//! underlying message, or the committed `{"target_uri": ...}` JSON. The
//! state cookie is cleared before the back-channel exchange so the
//! authorization code cannot be replayed, and cleared again (idempotently)
//! on any later failure.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use wl_config::LoginConfig;
use wl_oidc::{parse_token, validate_claims, StateStore, TokenExchanger};
use wl_types::{AppResult, CallbackRequest, CallbackResponse};

use crate::login;
use crate::observer::{AuthObserver, TracingObserver};
use crate::pages::{error_page, same_site_bounce, ErrorPageParams};
use crate::session::{materialize, run_login_hook, SessionCookie};

/// The protocol core: handles login initiation and the callback.
pub struct CallbackOrchestrator {
    config: LoginConfig,
    state_store: StateStore,
    exchanger: TokenExchanger,
    session: SessionCookie,
    observer: Arc<dyn AuthObserver>,
}

impl CallbackOrchestrator {
    pub fn new(config: LoginConfig) -> AppResult<Self> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_observer(config: LoginConfig, observer: Arc<dyn AuthObserver>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            state_store: StateStore::new(&config.cookie_secret),
            exchanger: TokenExchanger::new(config.token_endpoint.clone()),
            session: SessionCookie::new(&config.cookie_secret),
            observer,
            config,
        })
    }

    /// The session cookie handler, for adapters implementing auth read and
    /// logout endpoints.
    pub fn session(&self) -> &SessionCookie {
        &self.session
    }

    /// Start a login attempt; see [`login::handle_login`].
    pub fn handle_login(
        &self,
        req: &dyn CallbackRequest,
        res: &mut dyn CallbackResponse,
    ) -> AppResult<()> {
        login::handle_login(&self.config, &self.state_store, req, res)
    }

    /// Handle the authorization-code callback.
    pub async fn handle_callback(&self, req: &dyn CallbackRequest, res: &mut dyn CallbackResponse) {
        // Cookies set at login may not be visible until a top-level
        // navigation; bounce once to pick them up.
        if req.query("same_site").is_none() {
            debug!("no same_site marker, sending bounce page");
            res.html(&same_site_bounce());
            return;
        }

        let Some(state) = self.state_store.get(req, res) else {
            res.respond(400, "OpenID Connect cookie lost");
            return;
        };
        let mut target_uri = state.target_uri.clone();

        if req.query("error").is_some() {
            self.send_error_page(req, &target_uri, res);
            return;
        }

        let codes = req.query_all("code");
        let code = match codes.as_slice() {
            [] => {
                res.respond(400, "Missing code parameter");
                return;
            }
            [code] => code.clone(),
            _ => {
                res.respond(400, "Received more than one code.");
                return;
            }
        };

        if state.code_verifier.is_empty() {
            res.respond(400, "Missing code_verifier from session");
            return;
        }

        // Single-use enforcement: destroy the state before the exchange so
        // the code cannot be replayed even if the exchange fails.
        self.state_store.clear(res);

        let token = match self
            .exchanger
            .exchange(
                &code,
                &state.code_verifier,
                &state.redirect_uri,
                &self.config.client_id,
            )
            .await
        {
            Ok(token) => token,
            Err(e) => {
                self.state_store.clear(res);
                res.respond(500, &e.to_string());
                return;
            }
        };

        let parsed = match parse_token(&token) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.state_store.clear(res);
                res.respond(500, &e.to_string());
                return;
            }
        };

        let now = Utc::now().timestamp();
        if let Err(reason) =
            validate_claims(&parsed.payload, &self.config.client_id, &state.nonce, now)
        {
            self.observer.claim_rejected(&reason);
            res.respond(400, reason.message());
            return;
        }

        let mut auth = materialize(&parsed.payload);

        if let Some(hook) = &self.config.login_hook {
            run_login_hook(
                hook.as_ref(),
                &parsed,
                &mut auth,
                &mut target_uri,
                req,
                res,
                self.observer.as_ref(),
            )
            .await;
        }

        if let Some(wildcard) = req.query("wildcard_domain") {
            // The redirect URI domain is not registered with the provider;
            // defer the final redirect to a confirmation prompt.
            target_uri = self.wildcard_prompt_uri(&wildcard, req, &state.redirect_uri, &target_uri);
        }

        if let Err(e) = self.session.save(res, &auth, self.config.same_site_strict) {
            self.state_store.clear(res);
            res.respond(500, &e.to_string());
            return;
        }

        info!(
            "login committed for {}",
            auth.sub.as_deref().unwrap_or("<anonymous>")
        );
        res.json(&json!({ "target_uri": target_uri }));
    }

    /// Provider-reported error: redirect to the configured error route with
    /// every `error*`-prefixed parameter forwarded, or render the inline
    /// error page.
    fn send_error_page(
        &self,
        req: &dyn CallbackRequest,
        target_uri: &str,
        res: &mut dyn CallbackResponse,
    ) {
        if let Some(route) = &self.config.routes.error {
            let mut url = route.clone();
            let mut separator = if url.contains('?') { '&' } else { '?' };
            for (key, value) in req.query_pairs() {
                if key.starts_with("error") {
                    url.push(separator);
                    url.push_str(&urlencoding::encode(&key));
                    url.push('=');
                    url.push_str(&urlencoding::encode(&value));
                    separator = '&';
                }
            }
            res.redirect(&url);
            return;
        }

        let error = req.query("error").unwrap_or_default();
        let description = req.query("error_description");
        let uri = req.query("error_uri");
        res.html(&error_page(&ErrorPageParams {
            error: &error,
            error_description: description.as_deref(),
            error_uri: uri.as_deref(),
            target_uri,
        }));
    }

    fn wildcard_prompt_uri(
        &self,
        wildcard_domain: &str,
        req: &dyn CallbackRequest,
        redirect_uri: &str,
        target_uri: &str,
    ) -> String {
        let app_name = req
            .query("app_name")
            .unwrap_or_else(|| "Your App".to_string());

        format!(
            "{}?uri={}&appName={}&redirectURI={}&targetURI={}&wildcard_console=true",
            self.config.routes.api,
            urlencoding::encode(wildcard_domain),
            urlencoding::encode(&app_name),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(target_uri),
        )
    }
}
