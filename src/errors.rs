use thiserror::Error;

/// Every way a single item can fail.
///
/// The dispatcher does not distinguish kinds when it reports a tolerated
/// failure: the `Display` text becomes the item's `error` field.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Token endpoint rejected the client credentials, or they could not be resolved.
    #[error("credential validation failed: {0}")]
    Credentials(String),

    /// Item parameters are missing or malformed; raised before any network call.
    #[error("invalid parameters: {0}")]
    Validation(String),

    #[error("Criteo API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AgentError {
    pub fn validation(message: impl Into<String>) -> Self {
        AgentError::Validation(message.into())
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Credentials(_) => "credentials",
            AgentError::Validation(_) => "validation",
            AgentError::Api { .. } => "api",
            AgentError::Transport(_) => "transport",
            AgentError::Decode(_) => "decode",
        }
    }
}

/// Error that aborted a run, tagged with the zero-based index of the failing item.
#[derive(Error, Debug)]
#[error("item {index} failed: {source}")]
pub struct ItemError {
    pub index: usize,
    #[source]
    pub source: AgentError,
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_error_names_the_failing_index() {
        let err = ItemError {
            index: 2,
            source: AgentError::validation("audienceId is required"),
        };
        assert_eq!(
            err.to_string(),
            "item 2 failed: invalid parameters: audienceId is required"
        );
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let err = AgentError::Api {
            status: 400,
            body: r#"{"errors":[{"title":"bad algebra"}]}"#.to_owned(),
        };
        assert_eq!(err.kind(), "api");
        assert!(err.to_string().starts_with("Criteo API error 400:"));
    }
}
