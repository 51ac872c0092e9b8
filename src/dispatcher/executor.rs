//! Per-item execution.
//!
//! Items run strictly in order. Each one is validated, gets its own access
//! token, issues one API call and yields exactly one [`OutputItem`] whose
//! `pairedItem.item` is the input index.

use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::audience::params::ItemParameters;
use crate::audience::AudienceOperation;
use crate::config::credentials::Credentials;
use crate::config::settings::SettingsConfig;
use crate::errors::{AgentError, ItemError, Result};
use crate::observability::metrics::get_metrics;
use crate::sources::build_http_client;
use crate::sources::client::ApiClient;
use crate::sources::oauth2::{AccessToken, OAuth2Source};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputItem {
    pub json: Value,
    pub paired_item: PairedItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedItem {
    pub item: usize,
}

impl OutputItem {
    pub fn success(index: usize, response: Value) -> Self {
        Self { json: response, paired_item: PairedItem { item: index } }
    }

    pub fn failure(index: usize, err: &AgentError) -> Self {
        Self {
            json: json!({ "error": err.to_string() }),
            paired_item: PairedItem { item: index },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    token_source: OAuth2Source,
    api: ApiClient,
    continue_on_fail: bool,
}

impl Dispatcher {
    pub fn new(token_source: OAuth2Source, api: ApiClient, continue_on_fail: bool) -> Self {
        Self { token_source, api, continue_on_fail }
    }

    /// Builds the HTTP client, token source and API client from settings.
    pub fn from_settings(settings: &SettingsConfig, credentials: Credentials) -> Result<Self> {
        let client = build_http_client(&settings.api)?;
        let base_url = settings.api.base_url.as_str();
        Ok(Self::new(
            OAuth2Source::new(client.clone(), base_url, credentials),
            ApiClient::new(client, base_url),
            settings.continue_on_fail,
        ))
    }

    pub fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    pub fn token_source(&self) -> &OAuth2Source {
        &self.token_source
    }

    /// Runs every item. With `continue_on_fail` a failed item becomes
    /// `{"error": message}`; otherwise the first failure aborts the run and
    /// later items are never touched.
    pub async fn run(&self, items: &[Value]) -> std::result::Result<Vec<OutputItem>, ItemError> {
        let metrics = get_metrics().await;
        let mut output = Vec::with_capacity(items.len());
        info!("processing {} item(s), continue_on_fail={}", items.len(), self.continue_on_fail);

        for (index, parameters) in items.iter().enumerate() {
            match self.execute_item(index, parameters).await {
                Ok(response) => {
                    metrics.items_processed.with_label_values(&["success"]).inc();
                    output.push(OutputItem::success(index, response));
                }
                Err(err) if self.continue_on_fail => {
                    warn!(item = index, "item failed, continuing: {}", err);
                    metrics.items_processed.with_label_values(&["error"]).inc();
                    output.push(OutputItem::failure(index, &err));
                }
                Err(err) => {
                    error!(item = index, "item failed, aborting run: {}", err);
                    metrics.items_processed.with_label_values(&["aborted"]).inc();
                    return Err(ItemError { index, source: err });
                }
            }
        }

        info!("processed {} item(s)", output.len());
        Ok(output)
    }

    /// Validation happens before any network call; then token, then the operation.
    pub async fn execute_item(&self, index: usize, parameters: &Value) -> Result<Value> {
        let operation = ItemParameters::from_value(parameters)
            .and_then(ItemParameters::into_operation)
            .inspect_err(|err| {
                warn!(item = index, "rejected item parameters: {}", err);
            })?;

        let token = self.token_source.fetch_access_token().await?;
        self.call(index, &operation, &token).await
    }

    async fn call(
        &self,
        index: usize,
        operation: &AudienceOperation,
        token: &AccessToken,
    ) -> Result<Value> {
        let metrics = get_metrics().await;
        let method = operation.method();
        metrics
            .operation_requests
            .with_label_values(&[operation.name(), method.as_str()])
            .inc();
        info!(item = index, operation = operation.name(), endpoint = operation.endpoint(), "audience request");

        let started = Instant::now();
        let result = self
            .api
            .request(token, method, operation.endpoint(), Some(&operation.payload()), &operation.query())
            .await;
        metrics
            .operation_duration
            .with_label_values(&[operation.name()])
            .observe(started.elapsed().as_secs_f64());

        result.inspect_err(|err| {
            metrics
                .operation_failures
                .with_label_values(&[operation.name(), err.kind()])
                .inc();
        })
    }
}
