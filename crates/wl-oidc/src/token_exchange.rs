//! Back-channel token exchange
//!
//! One form-encoded POST to the provider token endpoint, exchanging the
//! authorization code + PKCE verifier for an ID token. No retries: any
//! failure surfaces immediately and the caller answers HTTP 500.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};
use wl_types::{AppError, AppResult};

/// Bound on the back-channel call; a timeout is an exchange failure.
const EXCHANGE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

/// Exchanges authorization codes at one token endpoint.
pub struct TokenExchanger {
    client: Client,
    token_endpoint: String,
}

impl TokenExchanger {
    pub fn new(token_endpoint: impl Into<String>) -> Self {
        // Panics only if the TLS backend cannot initialize at startup.
        let client = Client::builder()
            .timeout(Duration::from_secs(EXCHANGE_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            token_endpoint: token_endpoint.into(),
        }
    }

    /// Exchange an authorization code for a compact ID token.
    pub async fn exchange(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
        client_id: &str,
    ) -> AppResult<String> {
        debug!("exchanging authorization code at {}", self.token_endpoint);

        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("code_verifier", code_verifier);
        params.insert("redirect_uri", redirect_uri);
        params.insert("client_id", client_id);

        let response = self
            .client
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("token exchange failed with status {}: {}", status, body);
            return Err(AppError::TokenExchange(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("malformed token response: {}", e)))?;

        Ok(token_response.id_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{ "id_token": "aaa.bbb.ccc", "token_type": "Bearer" }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id_token, "aaa.bbb.ccc");
    }

    #[test]
    fn test_token_response_missing_id_token() {
        let json = r#"{ "access_token": "zzz" }"#;
        assert!(serde_json::from_str::<TokenResponse>(json).is_err());
    }

    #[tokio::test]
    async fn test_exchange_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=code_1"))
            .and(body_string_contains("code_verifier=verif_1"))
            .and(body_string_contains("client_id=client_abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "id_token": "h.p.s"
                })),
            )
            .mount(&server)
            .await;

        let exchanger = TokenExchanger::new(format!("{}/oauth/token", server.uri()));
        let token = exchanger
            .exchange("code_1", "verif_1", "https://app.example/cb", "client_abc")
            .await
            .unwrap();
        assert_eq!(token, "h.p.s");
    }

    #[tokio::test]
    async fn test_exchange_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let exchanger = TokenExchanger::new(server.uri());
        let err = exchanger
            .exchange("bad", "v", "https://app.example/cb", "c")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn test_exchange_malformed_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let exchanger = TokenExchanger::new(server.uri());
        let err = exchanger
            .exchange("code", "v", "https://app.example/cb", "c")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("malformed token response"));
    }
}
