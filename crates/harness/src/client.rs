//! Harness core: construction, login, request dispatch, registry access

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EnvConfig;
use crate::error::{ErrorBody, HarnessError, HarnessResult};
use crate::fixtures::Fixtures;
use crate::registry::{TestData, TestDataRegistry};
use crate::session::{Session, SessionState};
use crate::types::ExportPayload;

/// Placeholder body type for requests without a payload
pub(crate) const NO_BODY: Option<&()> = None;

/// Options recognised at construction
#[derive(Debug, Clone, Default)]
pub struct HarnessOptions {
    /// Request target; defaults to `EnvConfig::api_base_url`
    pub base_url: Option<String>,

    /// Pre-authenticated bearer token; skips login
    pub token: Option<String>,

    /// Request timeout in milliseconds; defaults to `EnvConfig::api_timeout_ms`
    pub timeout_ms: Option<u64>,

    /// Seed for the fixture generator (entropy when unset)
    pub seed: Option<u64>,
}

impl HarnessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Effective target and timeout of a harness
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login body; deployments name the token `token`, `accessToken` or
/// `access_token`, sometimes more than one at once
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "accessToken")]
    access_token: Option<String>,
    #[serde(default, rename = "access_token")]
    access_token_snake: Option<String>,
}

impl LoginResponse {
    /// First non-empty token, in `token`, `accessToken`, `access_token` order
    fn into_token(self) -> Option<String> {
        [self.token, self.access_token, self.access_token_snake]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
    }
}

/// Authenticated request façade over the backoffice API
///
/// All operations take `&self` and may run concurrently; the remote system
/// is responsible for any serialization. `login` is the only operation that
/// needs `&mut self`.
#[derive(Debug)]
pub struct ApiHarness {
    session: Session,
    http: reqwest::Client,
    env: EnvConfig,
    registry: Mutex<TestDataRegistry>,
    fixtures: Fixtures,
}

impl ApiHarness {
    /// Create a harness, filling unset options from the environment
    pub fn new(options: HarnessOptions) -> HarnessResult<Self> {
        let env = EnvConfig::from_env()?;
        Self::with_env(env, options)
    }

    /// Create an unauthenticated harness from environment defaults only
    pub fn from_env() -> HarnessResult<Self> {
        Self::new(HarnessOptions::default())
    }

    /// Create a harness against an explicit environment configuration
    pub fn with_env(env: EnvConfig, options: HarnessOptions) -> HarnessResult<Self> {
        let resolved = EnvConfig {
            api_base_url: options
                .base_url
                .unwrap_or_else(|| env.api_base_url.clone()),
            api_timeout_ms: options.timeout_ms.unwrap_or(env.api_timeout_ms),
            ..env
        };
        resolved.validate()?;

        let timeout = Duration::from_millis(resolved.api_timeout_ms);
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let session = Session::new(resolved.api_base_url.clone(), options.token, timeout);
        let fixtures = match options.seed {
            Some(seed) => Fixtures::seeded(seed),
            None => Fixtures::new(),
        };

        debug!(
            base_url = %session.base_url(),
            timeout_ms = resolved.api_timeout_ms,
            authenticated = session.token().is_some(),
            "harness created"
        );

        Ok(Self {
            session,
            http,
            env: resolved,
            registry: Mutex::new(TestDataRegistry::new()),
            fixtures,
        })
    }

    /// Second harness with the same target and timeout, authenticated with
    /// `token`, and with its own empty registry
    pub fn with_token(&self, token: impl Into<String>) -> HarnessResult<Self> {
        let options = HarnessOptions {
            base_url: Some(self.session.base_url().to_string()),
            token: Some(token.into()),
            timeout_ms: Some(self.env.api_timeout_ms),
            seed: None,
        };
        Self::with_env(self.env.clone(), options)
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Authenticate and keep the returned bearer token
    ///
    /// A failed login leaves the harness in its previous state. No retries.
    pub async fn login(&mut self, username: &str, password: &str) -> HarnessResult<String> {
        let body = LoginRequest { username, password };
        let response: LoginResponse = self
            .call(Method::POST, "/admin/auth/login", &[], Some(&body))
            .await?;

        let token = response.into_token().ok_or_else(|| {
            HarnessError::decode(
                "POST /admin/auth/login",
                <serde_json::Error as serde::de::Error>::custom("empty token"),
            )
        })?;

        self.session = self.session.with_token(token.clone());
        info!(username, base_url = %self.session.base_url(), "logged in");
        Ok(token)
    }

    /// Log in with the configured admin credentials
    pub async fn login_admin(&mut self) -> HarnessResult<String> {
        let username = self.env.admin_username.clone();
        let password = self.env.admin_password.clone();
        self.login(&username, &password).await
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.session.base_url().to_string(),
            timeout_ms: self.env.api_timeout_ms,
        }
    }

    pub fn env(&self) -> &EnvConfig {
        &self.env
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// `GET /health`; any failure counts as unhealthy
    pub async fn health_check(&self) -> bool {
        match self.send(Method::GET, "/health", &[], NO_BODY).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Test data registry
    // ------------------------------------------------------------------

    /// Snapshot of the identifiers created through this harness
    pub fn test_data(&self) -> TestData {
        self.registry.lock().clone()
    }

    /// Reset local bookkeeping; remote resources are left alone
    pub fn clear_test_data(&self) {
        self.registry.lock().clear();
    }

    pub(crate) fn track<F>(&self, update: F)
    where
        F: FnOnce(&mut TestDataRegistry),
    {
        update(&mut *self.registry.lock());
    }

    // ------------------------------------------------------------------
    // Raw request surface
    // ------------------------------------------------------------------

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> HarnessResult<T>
    where
        T: DeserializeOwned,
    {
        self.call(Method::GET, path, query, NO_BODY).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> HarnessResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> HarnessResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete<T>(&self, path: &str) -> HarnessResult<T>
    where
        T: DeserializeOwned,
    {
        self.call(Method::DELETE, path, &[], NO_BODY).await
    }

    /// Request whose body is returned as raw bytes with its content type
    pub async fn fetch_bytes<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> HarnessResult<ExportPayload>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, query, body).await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok(ExportPayload {
            status,
            content_type,
            bytes,
        })
    }

    /// Dispatch a request and decode a JSON body
    pub(crate) async fn call<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> HarnessResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let context = format!("{} {}", method, path);
        let response = self.send(method, path, query, body).await?;
        let bytes = response.bytes().await?;
        // 204 and friends decode as an empty object
        let slice: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
        serde_json::from_slice(slice).map_err(|e| HarnessError::decode(context, e))
    }

    /// Dispatch a request; any non-2xx becomes `HarnessError::Status`
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> HarnessResult<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.session.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "backoffice request");

        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await?;
        Err(HarnessError::Status {
            status,
            body: ErrorBody::from_text(raw),
        })
    }
}
