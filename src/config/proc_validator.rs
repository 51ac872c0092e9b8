//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks the API endpoint, timeout, logging, metrics and credential sources

use tracing::{error, info};

use crate::config::service::{CredentialsConfig, SecretValue, ServiceConfig};
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    let base_url = &settings.api.base_url;
    let scheme_ok = base_url.starts_with("https://") || base_url.starts_with("http://");
    let host = base_url.split_once("://").map(|(_, rest)| rest).unwrap_or("");
    if !scheme_ok || host.is_empty() {
        errors.push(format!(
            "settings.api.base_url '{}' must be an http(s) URL",
            base_url
        ));
    } else if host.contains('/') || host.contains('?') {
        errors.push(format!(
            "settings.api.base_url '{}' must not contain a path or query",
            base_url
        ));
    }

    if settings.api.timeout_ms == Some(0) {
        errors.push("settings.api.timeout_ms must be > 0".to_string());
    }

    if settings.metrics.is_enabled && settings.metrics.path.trim().is_empty() {
        errors.push("settings.metrics.path cannot be empty when metrics are enabled".to_string());
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    validate_secret_value("credentials.client_id", &credentials.client_id, errors);
    validate_secret_value("credentials.client_secret", &credentials.client_secret, errors);
}

fn validate_secret_value(path: &str, v: &SecretValue, errors: &mut Vec<String>) {
    match v {
        SecretValue::Literal { value } => {
            if value.trim().is_empty() {
                errors.push(format!("{}: literal value cannot be empty", path));
            }
        }
        SecretValue::FromEnv { from_env } => {
            if from_env.trim().is_empty() {
                errors.push(format!("{}: env name cannot be empty", path));
            }
        }
        SecretValue::FromFile { path: p } => {
            // existence is checked when the value is resolved
            if p.trim().is_empty() {
                errors.push(format!("{}: file path cannot be empty", path));
            }
        }
    }
}
