// Error taxonomy for the joke client. Every step of the run returns one of
// these; none of them is retried.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JokeError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to endpoint {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any non-success status, including on the ping endpoint.
    #[error("accessing endpoint {endpoint} failed: {status}")]
    Unreachable { endpoint: String, status: StatusCode },

    #[error("malformed response from endpoint {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid category entered: {0}")]
    InvalidCategory(String),

    #[error("invalid type entered: {0} (expected single or twopart)")]
    InvalidType(String),

    #[error("received error response from endpoint {endpoint}")]
    Api { endpoint: String },

    #[error("empty joke field received from endpoint {endpoint}")]
    EmptyContent { endpoint: String },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
