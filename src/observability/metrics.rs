use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::info;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_fetch_requests: IntCounter,
    pub token_fetch_failures: IntCounterVec,

    // Operation metrics
    pub operation_requests: IntCounterVec,
    pub operation_failures: IntCounterVec,
    pub operation_duration: HistogramVec,

    // Items
    pub items_processed: IntCounterVec,

    // Config
    pub config_validation_errors: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("audienceagent".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_fetch_requests: IntCounter::new("token_fetch_requests_total", "Total client-credentials token requests").unwrap(),
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Token request failures by reason"), &["reason"]).unwrap(),

            // Operation
            operation_requests: IntCounterVec::new(Opts::new("operation_requests_total", "Audience API calls by operation"), &["operation", "method"]).unwrap(),
            operation_failures: IntCounterVec::new(Opts::new("operation_failures_total", "Audience operation failures by reason"), &["operation", "reason"]).unwrap(),
            operation_duration: HistogramVec::new(HistogramOpts::new("operation_duration_seconds", "Audience API call duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["operation"]).unwrap(),

            items_processed: IntCounterVec::new(Opts::new("items_processed_total", "Input items by outcome"), &["outcome"]).unwrap(),

            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.operation_requests.clone())).unwrap();
        reg.register(Box::new(metrics.operation_failures.clone())).unwrap();
        reg.register(Box::new(metrics.operation_duration.clone())).unwrap();
        reg.register(Box::new(metrics.items_processed.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();

        metrics
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Write the exposition to `path` (node-exporter textfile collector format)
    pub async fn write_textfile(&self, path: &Path) -> anyhow::Result<()> {
        let rendered = self.render()?;
        // write-then-rename so collectors never read a partial file
        let tmp = path.with_extension("prom.tmp");
        tokio::fs::write(&tmp, rendered).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn textfile_contains_namespaced_metrics() {
        let metrics = get_metrics().await;
        metrics.token_fetch_requests.inc();
        metrics.items_processed.with_label_values(&["success"]).inc();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.prom");
        metrics.write_textfile(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("audienceagent_token_fetch_requests_total"));
        assert!(content.contains("audienceagent_items_processed_total{outcome=\"success\"}"));
        assert!(!dir.path().join("agent.prom.tmp").exists());
    }
}
