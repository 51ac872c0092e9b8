use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::{AgentError, Result};
use crate::sources::oauth2::AccessToken;

const APPLICATION_JSON: &str = "application/json";

/// Authenticated JSON client for `<base_url><endpoint>` calls
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_owned(),
        }
    }

    /// Sends one request and returns the parsed JSON response.
    ///
    /// Query values are percent-encoded flat pairs; a non-2xx status becomes
    /// [`AgentError::Api`] carrying the response body. A successful empty body
    /// is returned as `{}`.
    pub async fn request<B>(
        &self,
        token: &AccessToken,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "calling Criteo API");

        let mut request = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", token.value))
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(&text)?)
    }
}
