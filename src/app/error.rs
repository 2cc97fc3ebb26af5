use crate::reporter::context::RunContextBuilderError;
use lettre::address::AddressError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Invalid mailbox in {variable}: {source}")]
    InvalidAddress {
        variable: &'static str,
        #[source]
        source: AddressError,
    },
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid run context: {0}")]
    Context(#[from] RunContextBuilderError),
}

/// Recovered locally, the affected result file is skipped
#[derive(Debug, Error)]
pub enum ResultParseError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} holds null instead of a result", path.display())]
    Null { path: PathBuf },
}

#[derive(Debug, Error)]
#[error("Failed to render report: {0}")]
pub struct RenderError(#[from] liquid::Error);

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("relay rejected the credentials: {0}")]
    Authentication(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("cannot build message: {0}")]
    Message(#[from] lettre::error::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl DeliveryError {
    /// SMTP 530/534/535 and the usual relay wording for rejected logins
    pub fn is_authentication_failure(code: Option<&str>, message: &str) -> bool {
        if let Some("530" | "534" | "535") = code {
            return true;
        }
        let message = message.to_lowercase();
        message.contains("invalid login")
            || message.contains("username and password not accepted")
            || message.contains("authentication failed")
    }
}

impl From<lettre::transport::smtp::Error> for DeliveryError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        let code = err.status().map(|code| code.to_string());
        let message = err.to_string();
        if Self::is_authentication_failure(code.as_deref(), &message) {
            DeliveryError::Authentication(message)
        } else {
            DeliveryError::Transport(message)
        }
    }
}
