// @file: market_adapter/src/core/error.rs
// @description: Error taxonomy shared by the fetcher, the HTTP layer and the translation tables.
// @author: LAS.

use thiserror::Error;

//
// TYPE DEFINITIONS
//

pub type AdapterResult<T> = Result<T, AdapterError>;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// Caller supplied an invalid combination of arguments. Raised before any I/O.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// A value with no counterpart in the target enum.
    #[error("unrecognized {kind}: {value}")]
    Unrecognized { kind: &'static str, value: String },

    #[error("method {method} not available for {path}")]
    MethodNotAvailable { method: String, path: String },

    #[error("missing API credentials for signed request to {0}")]
    MissingCredentials(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (HTTP {status}, code {code}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    #[error("rate limited (HTTP {status}): {msg}")]
    RateLimited { status: u16, msg: String },

    /// The backfill could not page past `at_ms` without dropping trades.
    #[error("incomplete backfill for {symbol}: more trades at {at_ms} ms than one page holds")]
    Incomplete { symbol: String, at_ms: u64 },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AdapterError {
    pub fn unrecognized(kind: &'static str, value: impl ToString) -> Self {
        AdapterError::Unrecognized { kind, value: value.to_string() }
    }

    /// Throttling and transport failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdapterError::RateLimited { .. } | AdapterError::Transport(_))
    }
}

impl From<config::ConfigError> for AdapterError {
    fn from(err: config::ConfigError) -> Self {
        AdapterError::Config(err.to_string())
    }
}
