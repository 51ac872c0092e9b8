// tests/common/mod.rs
use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;
use serde_json::json;

use crate::config::credentials::Credentials;
use crate::dispatcher::executor::Dispatcher;
use crate::sources::client::ApiClient;
use crate::sources::oauth2::OAuth2Source;

pub const TEST_TOKEN: &str = "test-access-token";
pub const BEARER_TEST_TOKEN: &str = "Bearer test-access-token";

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Dispatcher pointed at the mock server for both token and API calls
pub fn dispatcher_for(server: &MockServer, continue_on_fail: bool) -> Dispatcher {
    let client = build_reqwest_client();
    let base_url = server.base_url();
    Dispatcher::new(
        OAuth2Source::new(client.clone(), &base_url, Credentials::new("client-id", "client-secret")),
        ApiClient::new(client, &base_url),
        continue_on_fail,
    )
}

/// Token endpoint that always grants `TEST_TOKEN`
pub fn mock_token_endpoint(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/oauth2/token")
            .form_urlencoded_tuple("grant_type", "client_credentials")
            .form_urlencoded_tuple("client_id", "client-id")
            .form_urlencoded_tuple("client_secret", "client-secret");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": TEST_TOKEN, "token_type": "Bearer", "expires_in": 900}));
    })
}
