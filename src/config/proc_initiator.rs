use crate::config::service::ServiceConfig;
use crate::config::settings::{LogFormat, LoggingConfig};

pub fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::Compact));
    }
    // endpoints are appended as absolute paths
    let base_url = config.settings.api.base_url.trim().trim_end_matches('/').to_owned();
    config.settings.api.base_url = base_url;
    config
}
