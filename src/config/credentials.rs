//! Resolved OAuth2 client credentials.
//!
//! Values are read once per run from the configured [`SecretValue`]s and are
//! never persisted or logged.

use std::{env, fmt, fs};

use crate::config::service::{CredentialsConfig, SecretValue};
use crate::errors::{AgentError, Result};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn resolve(config: &CredentialsConfig) -> Result<Self> {
        let client_id = resolve_secret_value("client_id", &config.client_id)?;
        let client_secret = resolve_secret_value("client_secret", &config.client_secret)?;
        Ok(Self { client_id, client_secret })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

fn resolve_secret_value(field: &str, value: &SecretValue) -> Result<String> {
    let resolved = match value {
        SecretValue::Literal { value } => value.to_owned(),
        SecretValue::FromEnv { from_env } => env::var(from_env).map_err(|err| {
            AgentError::Credentials(format!("{field}: env '{from_env}' is not readable: {err}"))
        })?,
        SecretValue::FromFile { path } => fs::read_to_string(path)
            .map(|content| content.trim().to_string())
            .map_err(|err| {
                AgentError::Credentials(format!("{field}: file '{path}' is not readable: {err}"))
            })?,
    };

    if resolved.trim().is_empty() {
        return Err(AgentError::Credentials(format!("{field} is empty")));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn literal(value: &str) -> SecretValue {
        SecretValue::Literal { value: value.to_owned() }
    }

    #[test]
    fn resolves_literal_values() {
        let cfg = CredentialsConfig {
            client_id: literal("id-1"),
            client_secret: literal("secret-1"),
        };
        let creds = Credentials::resolve(&cfg).unwrap();
        assert_eq!(creds, Credentials::new("id-1", "secret-1"));
    }

    #[test]
    #[serial]
    fn resolves_env_and_file_values() {
        std::env::set_var("AUDIENCE_AGENT_TEST_CLIENT_ID", "env-id");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-secret  ").unwrap();

        let cfg = CredentialsConfig {
            client_id: SecretValue::FromEnv { from_env: "AUDIENCE_AGENT_TEST_CLIENT_ID".to_owned() },
            client_secret: SecretValue::FromFile { path: file.path().display().to_string() },
        };
        let creds = Credentials::resolve(&cfg).unwrap();
        assert_eq!(creds.client_id, "env-id");
        assert_eq!(creds.client_secret, "file-secret");
        std::env::remove_var("AUDIENCE_AGENT_TEST_CLIENT_ID");
    }

    #[test]
    #[serial]
    fn missing_env_is_a_credentials_error() {
        std::env::remove_var("AUDIENCE_AGENT_TEST_MISSING");
        let cfg = CredentialsConfig {
            client_id: SecretValue::FromEnv { from_env: "AUDIENCE_AGENT_TEST_MISSING".to_owned() },
            client_secret: literal("secret"),
        };
        let err = Credentials::resolve(&cfg).unwrap_err();
        assert_eq!(err.kind(), "credentials");
    }

    #[test]
    fn debug_output_hides_secret() {
        let creds = Credentials::new("id-1", "very-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("id-1"));
        assert!(!printed.contains("very-secret"));
    }
}
