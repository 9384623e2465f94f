//! HTTP client for the TDEI management API.
//!
//! `TdeiClient` wraps a `reqwest::Client` and an optional `TokenProvider`
//! behind a `Mutex`. Without a provider it sends no `Authorization` header,
//! which is how suites exercise the "no auth token → 401" paths.
//!
//! Token lifecycle (authenticated clients only):
//! - Lazy acquisition: the first request that finds no cached token logs in.
//! - Expiry-aware: an expired token triggers a fresh login on the next request.
//! - One-shot 401 retry: a 401 from the API invalidates the token, logs in
//!   once more and retries exactly once. Providers without credentials (fixed
//!   tokens) skip the retry so the original 401 reaches the caller.
//!
//! Every non-2xx response becomes `HarnessError::Api` with the body preserved.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::auth::{TokenProvider, auth_header};
use crate::config::{HarnessConfig, normalize_base_url};
use crate::error::{HarnessError, Result};

/// Connect timeout (TCP + TLS handshake).
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout. Matches the 50s setup budget the suites allow.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(50);

fn build_api_client() -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(API_CONNECT_TIMEOUT)
        .timeout(API_REQUEST_TIMEOUT)
        .build()?)
}

/// `{ "data": ... }` envelope used by create, register, permission and
/// roles endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiData<T> {
    pub data: T,
}

/// Query string pairs. Repeated keys are allowed (`bbox=1&bbox=2...`).
pub type QueryPairs = Vec<(&'static str, String)>;

/// Client for the TDEI REST API.
///
/// - `auth` is `None` for anonymous clients.
/// - The lock is held only for the token check/refresh, never across an API
///   round-trip.
/// - `base_url` always ends with `/`; paths are relative (`api/v1/...`).
pub struct TdeiClient {
    client: Client,
    base_url: String,
    auth: Option<Mutex<TokenProvider>>,
}

impl TdeiClient {
    /// Client authenticated as the admin account from `config`.
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        Self::with_provider(&config.base_url(), TokenProvider::from_config(config))
    }

    /// Client that sends no `Authorization` header.
    pub fn anonymous(base_url: &str) -> Result<Self> {
        Ok(TdeiClient {
            client: build_api_client()?,
            base_url: normalize_base_url(base_url),
            auth: None,
        })
    }

    /// Client authenticated through an arbitrary token provider, e.g. a
    /// producer user's login or a fixed test token.
    pub fn with_provider(base_url: &str, provider: TokenProvider) -> Result<Self> {
        Ok(TdeiClient {
            client: build_api_client()?,
            base_url: normalize_base_url(base_url),
            auth: Some(Mutex::new(provider)),
        })
    }

    /// Client that logs in as `username`/`password` against `config`'s gateway.
    pub fn for_user(config: &HarnessConfig, username: &str, password: &str) -> Result<Self> {
        let base_url = config.base_url();
        Self::with_provider(&base_url, TokenProvider::new(&base_url, username, password))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Makes sure a valid token is cached, logging in if needed.
    ///
    /// A no-op for anonymous clients. Useful to fail fast before a sequence
    /// of calls that all need authentication.
    pub async fn ensure_token(&self) -> Result<()> {
        self.bearer_token().await.map(|_| ())
    }

    async fn bearer_token(&self) -> Result<Option<String>> {
        let Some(auth) = &self.auth else {
            return Ok(None);
        };
        let mut auth = auth.lock().await;
        if auth.token().is_none() {
            auth.refresh_token().await?;
        }
        auth.token()
            .map(|t| Some(t.to_owned()))
            .ok_or_else(|| HarnessError::Auth {
                status: None,
                message: "token missing after refresh".to_string(),
                source: None,
            })
    }

    /// Invalidates the token and logs in again. Returns `None` when the
    /// provider cannot refresh, in which case the caller keeps the 401.
    async fn force_refresh(&self) -> Result<Option<String>> {
        let Some(auth) = &self.auth else {
            return Ok(None);
        };
        let mut auth = auth.lock().await;
        if !auth.can_refresh() {
            return Ok(None);
        }
        auth.invalidate();
        auth.refresh_token().await?;
        Ok(auth.token().map(str::to_owned))
    }

    /// Core request path shared by every verb helper. Returns the successful
    /// response; non-2xx statuses are mapped to `HarnessError::Api`.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "sending request");

        let token = self.bearer_token().await?;
        let resp = self
            .build_request(method.clone(), &url, query, token.as_deref(), body)?
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            if let Some(fresh) = self.force_refresh().await? {
                let retry = self
                    .build_request(method, &url, query, Some(&fresh), body)?
                    .send()
                    .await?;
                return check_status(retry).await;
            }
        }

        check_status(resp).await
    }

    fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        query: &[(&'static str, String)],
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<reqwest::RequestBuilder> {
        let mut req = self.client.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = token {
            req = req.headers(auth_header(token)?);
        }
        if let Some(payload) = body {
            req = req.json(payload);
        }
        Ok(req)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<T> {
        let resp = self.send(method, path, query, body).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends an authenticated GET and deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json::<T, ()>(Method::GET, path, &[], None).await
    }

    /// GET with query-string filters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        self.send_json::<T, ()>(Method::GET, path, query, None).await
    }

    /// POST with a JSON body; deserializes the JSON response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(Method::POST, path, &[], Some(body)).await
    }

    /// PUT with a JSON body; the response body is ignored.
    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(Method::PUT, path, &[], Some(body)).await?;
        Ok(())
    }

    /// PUT without a body; the response body is ignored.
    pub async fn put_empty(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::PUT, path, &[], None).await?;
        Ok(())
    }

    /// DELETE with query parameters; the response body is ignored.
    pub async fn delete(&self, path: &str, query: &[(&'static str, String)]) -> Result<()> {
        self.send::<()>(Method::DELETE, path, query, None).await?;
        Ok(())
    }
}

/// Passes 2xx responses through and turns everything else into
/// `HarnessError::Api`, reading the body first so the server's validation
/// message is kept.
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(%status, %body, "request rejected");
    Err(HarnessError::Api { status, body })
}
