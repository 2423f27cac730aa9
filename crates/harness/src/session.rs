//! Session value: target, credentials, timeout

use std::time::Duration;

/// Authentication state of a harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Immutable request context for one harness
///
/// Changing the token produces a new `Session`; fields are never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl Session {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // an empty token is the same as none
        let token = token.filter(|t| !t.is_empty());
        Self {
            base_url,
            token,
            timeout,
        }
    }

    /// Same target and timeout, different credentials
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self::new(self.base_url.clone(), Some(token.into()), self.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn state(&self) -> SessionState {
        if self.token.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
