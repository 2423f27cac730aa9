//! Error types for the harness

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type alias using [`HarnessError`]
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Harness error types
///
/// Failures from the remote system are carried verbatim so tests can assert
/// on the exact status code and message.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// No response was received (connect failure, timeout, broken body)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote system answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: ErrorBody },

    /// A 2xx body did not have the expected shape
    #[error("Unexpected response body for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification of a failure as seen by the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or timeout, no response received
    Transport,
    /// 4xx
    Client,
    /// 5xx
    Server,
    /// Local problem (config, decoding)
    Local,
}

/// Response body of a failed request, kept both raw and parsed
#[derive(Debug, Clone)]
pub struct ErrorBody {
    pub raw: String,
    pub json: Option<Value>,
}

impl ErrorBody {
    pub fn from_text(raw: String) -> Self {
        let json = serde_json::from_str(&raw).ok();
        Self { raw, json }
    }

    /// The `message` field of a JSON error body, if any
    pub fn message(&self) -> Option<&str> {
        let json = self.json.as_ref()?;
        json.get("message")
            .or_else(|| json.get("error"))
            .and_then(Value::as_str)
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            f.write_str("<empty body>")
        } else {
            f.write_str(&self.raw)
        }
    }
}

impl HarnessError {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        HarnessError::Decode {
            context: context.into(),
            source,
        }
    }

    /// HTTP status returned by the remote system, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HarnessError::Status { status, .. } => Some(*status),
            HarnessError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Body returned alongside a non-2xx status
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            HarnessError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Convenience accessor for the remote `message` field
    pub fn message(&self) -> Option<&str> {
        self.body().and_then(ErrorBody::message)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Transport(_) => ErrorKind::Transport,
            HarnessError::Status { status, .. } if status.is_server_error() => ErrorKind::Server,
            HarnessError::Status { .. } => ErrorKind::Client,
            _ => ErrorKind::Local,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HarnessError::Transport(e) if e.is_timeout())
    }
}
