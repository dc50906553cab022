use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Missing {0} query param")]
    MissingParameter(String),

    #[error("Forbidden target: {0}")]
    ForbiddenTarget(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingParameter(_) => 400,
            ProxyError::ForbiddenTarget(_) => 403,
            ProxyError::FetchFailed(_) => 500,
            ProxyError::MalformedUrl(_)
            | ProxyError::Config(_)
            | ProxyError::Network(_)
            | ProxyError::Internal(_) => 500,
        }
    }

    /// Plain-text body returned to the client for this error.
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::MissingParameter(name) => format!("Missing {} query param", name),
            ProxyError::ForbiddenTarget(_) => "Proxy to localhost is disabled for safety".into(),
            ProxyError::FetchFailed(reason) => format!("Proxy fetch failed: {}", reason),
            ProxyError::MalformedUrl(_) => "Malformed URL".into(),
            ProxyError::Config(_) | ProxyError::Network(_) | ProxyError::Internal(_) => {
                "Internal server error".into()
            }
        }
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
