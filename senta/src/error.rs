use crate::config::ConfigError;

/// Boxed error returned by processing units and injected capabilities
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the senta core
#[derive(Debug, thiserror::Error)]
pub enum SentaError {
    #[error("Invalid response type: {0}")]
    InvalidResponseType(String),

    #[error("Failed to compile route pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Route pattern '{pattern}' does not match path '{path}'")]
    NoMatch { pattern: String, path: String },

    #[error("Failed to parse request url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cannot send an absent value as a response body")]
    AbsentBody,

    #[error("Failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to deserialize query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),

    #[error(
        "fetch capability is not configured. Set `SentaConfig::fetch` (for example `ReqwestFetch`, \
         available with the `reqwest` feature) before calling `App::fetch`."
    )]
    FetchUnavailable,

    #[error("fetch failed: {0}")]
    Fetch(#[source] BoxError),

    #[error("Server is not listening")]
    NotListening,

    #[error("Server is already listening on {0}")]
    AlreadyListening(std::net::SocketAddr),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
