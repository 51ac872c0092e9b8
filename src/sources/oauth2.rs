use std::fmt;

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::credentials::Credentials;
use crate::errors::{AgentError, Result};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{GRANT_TYPE_CLIENT_CREDENTIALS, TOKEN_ENDPOINT};

/// Short-lived bearer token. Never cached, never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client-credentials grant against `<base_url>/oauth2/token`
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    client: Client,
    token_url: String,
    credentials: Credentials,
}

impl OAuth2Source {
    pub fn new(client: Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            client,
            token_url: format!("{}{}", base_url, TOKEN_ENDPOINT),
            credentials,
        }
    }

    /// Requests a fresh token; every call hits the token endpoint.
    pub async fn fetch_access_token(&self) -> Result<AccessToken> {
        let metrics = get_metrics().await;
        let response = self.request_token().await?;
        let body = response.text().await.inspect_err(|_| {
            metrics.token_fetch_failures.with_label_values(&["transport"]).inc();
        })?;
        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            metrics.token_fetch_failures.with_label_values(&["decode"]).inc();
            AgentError::Credentials(format!("token response has no access_token: {}", e))
        })?;
        debug!("access token acquired");
        Ok(AccessToken { value: parsed.access_token })
    }

    /// Connectivity probe: succeeds on any 2xx from the token endpoint.
    pub async fn test_credentials(&self) -> Result<()> {
        self.request_token().await.map(|_| ())
    }

    async fn request_token(&self) -> Result<Response> {
        let metrics = get_metrics().await;
        metrics.token_fetch_requests.inc();
        let form = [
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        debug!(url = %self.token_url, "requesting access token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&form[..])
            .send()
            .await
            .map_err(|e| {
                warn!("token request failed: {}", e);
                metrics.token_fetch_failures.with_label_values(&["transport"]).inc();
                AgentError::Credentials(format!("token endpoint unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics.token_fetch_failures.with_label_values(&["status"]).inc();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Credentials(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }
        Ok(response)
    }
}
