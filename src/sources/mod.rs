/// Sources module
///
/// The OAuth2 client-credentials token source and the authenticated client
/// used for every Marketing Solutions call.

pub mod oauth2;
pub mod client;

use std::time::Duration;

use reqwest::Client;

use crate::config::settings::ApiConfig;

/// Shared HTTP client; without a configured timeout the transport default applies.
pub fn build_http_client(api: &ApiConfig) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout_ms) = api.timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }
    builder.build()
}
