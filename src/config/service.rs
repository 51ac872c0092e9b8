use serde::Deserialize;

use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub credentials: CredentialsConfig,
}

/// ================================
/// Credentials
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub client_id: SecretValue,
    pub client_secret: SecretValue,
}

/// Where a credential value comes from
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SecretValue {
    Literal {
        value: String,
    },
    FromEnv {
        from_env: String,
    },
    FromFile {
        path: String,
    },
}
