use std::{fs, path::Path};
use crate::config::proc_initiator::initiate_default_values;
use crate::config::proc_validator;
use crate::config::service::ServiceConfig;
use crate::observability::metrics::get_metrics;
use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
            metrics.config_validation_errors.inc();
        })?;

    service_config = initiate_default_values(service_config);
    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)
        .await
        .map_err(|errors| {
            anyhow!(
                "config is not valid, total errors:{}, \n{}",
                errors.len(),
                errors.join("\n")
            )
        })?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with environment values
fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::service::SecretValue;
    use crate::config::settings::LogFormat;
    use serial_test::serial;
    use std::io::Write;

    #[tokio::test]
    async fn minimal_config_gets_defaults() {
        let yaml = r#"
credentials:
  client_id: { value: "abc" }
  client_secret: { from_env: CRITEO_CLIENT_SECRET }
"#;
        let cfg = parse_config(yaml.to_owned()).await.unwrap();
        assert_eq!(cfg.settings.api.base_url, "https://api.criteo.com");
        assert!(cfg.settings.api.timeout_ms.is_none());
        assert!(!cfg.settings.continue_on_fail);
        assert!(!cfg.settings.metrics.is_enabled);
        let logging = cfg.settings.logging.unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);
        assert!(matches!(cfg.credentials.client_secret, SecretValue::FromEnv { .. }));
    }

    #[tokio::test]
    async fn invalid_config_reports_all_errors() {
        let yaml = r#"
settings:
  api:
    base_url: "ftp://api.criteo.com"
    timeout_ms: 0
  logging:
    level: loud
    format: json
credentials:
  client_id: { value: "" }
  client_secret: { value: "s" }
"#;
        let err = parse_config(yaml.to_owned()).await.unwrap_err().to_string();
        assert!(err.contains("total errors:4"), "{err}");
        assert!(err.contains("settings.api.base_url"));
        assert!(err.contains("settings.api.timeout_ms"));
        assert!(err.contains("settings.logging.level"));
        assert!(err.contains("credentials.client_id"));
    }

    #[tokio::test]
    #[serial]
    async fn file_config_expands_env_placeholders() {
        std::env::set_var("AUDIENCE_AGENT_TEST_BASE_URL", "http://127.0.0.1:9999");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
settings:
  api:
    base_url: "${{AUDIENCE_AGENT_TEST_BASE_URL}}/"
  continue_on_fail: ${{AUDIENCE_AGENT_TEST_TOLERATE:true}}
credentials:
  client_id: {{ value: "abc" }}
  client_secret: {{ value: "def" }}
"#
        )
        .unwrap();

        let cfg = file_to_config(file.path()).await.unwrap();
        assert_eq!(cfg.settings.api.base_url, "http://127.0.0.1:9999");
        assert!(cfg.settings.continue_on_fail);
        std::env::remove_var("AUDIENCE_AGENT_TEST_BASE_URL");
    }
}
