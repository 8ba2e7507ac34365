use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Projection error: {0}")]
    Projection(String),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Search query must not be empty")]
    EmptyQuery,
    #[error("Request was superseded or aborted")]
    Cancelled,
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),
}

impl SearchError {
    /// `true` when the request was cancelled by a newer call or by `abort`.
    ///
    /// Hosts typically ignore these instead of surfacing them to the user.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
