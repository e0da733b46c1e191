use thiserror::Error;

/// Why a weather fetch failed.
///
/// Every variant renders with a `fetch failed` prefix, so a caller that only
/// wants a single generic failure can show the message as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch failed: city name is empty")]
    EmptyCity,

    #[error("fetch failed: network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("fetch failed: unexpected HTTP status {0}")]
    Status(u16),

    #[error("fetch failed: unknown location '{0}'")]
    NotFound(String),

    /// The body is not the JSON document we expect.
    #[error("fetch failed: malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON decoded but a value in it is unusable.
    #[error("fetch failed: malformed response: {0}")]
    Malformed(String),
}
