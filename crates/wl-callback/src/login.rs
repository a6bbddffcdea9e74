//! Login initiation
//!
//! Produces the state the callback consumes: generates the PKCE material and
//! nonce, seals them into the state cookie, and redirects the browser to the
//! provider authorization endpoint.

use chrono::Utc;
use tracing::debug;
use wl_config::LoginConfig;
use wl_oidc::{generate_nonce, generate_pkce, OidcState, StateStore};
use wl_types::{AppResult, CallbackRequest, CallbackResponse};

/// Build the provider authorization URL for one login attempt.
pub fn build_authorization_url(config: &LoginConfig, code_challenge: &str, nonce: &str) -> String {
    let mut url = format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&code_challenge={}&code_challenge_method=S256&nonce={}",
        config.authorization_endpoint,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(code_challenge),
        urlencoding::encode(nonce),
    );

    if !config.scopes.is_empty() {
        let scopes = config.scopes.join(" ");
        url.push_str(&format!("&scope={}", urlencoding::encode(&scopes)));
    }

    if !config.provider_hint.is_empty() {
        let hints = config.provider_hint.join(" ");
        url.push_str(&format!("&provider_hint={}", urlencoding::encode(&hints)));
    }

    url
}

/// Start a login: persist fresh OIDC state and redirect to the provider.
///
/// The optional `target_uri` query parameter picks the post-login
/// destination; it defaults to `/`.
pub fn handle_login(
    config: &LoginConfig,
    store: &StateStore,
    req: &dyn CallbackRequest,
    res: &mut dyn CallbackResponse,
) -> AppResult<()> {
    let target_uri = req.query("target_uri").unwrap_or_else(|| "/".to_string());

    let pkce = generate_pkce();
    let nonce = generate_nonce();

    let state = OidcState {
        code_verifier: pkce.code_verifier,
        nonce: nonce.clone(),
        redirect_uri: config.redirect_uri.clone(),
        target_uri,
        iat: Utc::now().timestamp(),
    };
    store.save(res, &state, config.same_site_strict)?;

    let url = build_authorization_url(config, &pkce.code_challenge, &nonce);
    debug!("redirecting to authorization endpoint");
    res.redirect(&url);
    Ok(())
}
