//! Login handshake and bearer-token management for the TDEI gateway.
//!
//! TDEI issues tokens from `POST api/v1/authenticate` (username/password) and
//! rotates them through `POST api/v1/refresh-token`. This module exposes the
//! raw calls ([`login`], [`refresh`]) for suites that assert on them directly,
//! plus a [`TokenProvider`] that caches a token for `TdeiClient` and logs in
//! again when it is absent or stale.

use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::{HarnessConfig, normalize_base_url};
use crate::error::{HarnessError, Result};

const AUTHENTICATE_PATH: &str = "api/v1/authenticate";
const REFRESH_TOKEN_PATH: &str = "api/v1/refresh-token";

/// Timeout for the small authenticate/refresh requests.
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Safety buffer subtracted from `expires_in` so a request never races the
/// expiry boundary.
const EXPIRY_BUFFER_SECS: u64 = 60;

/// JSON body of the authenticate call.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token pair returned by authenticate and refresh-token.
///
/// Only the two token strings are guaranteed; the lifetimes are optional so
/// a gateway that omits them still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

fn token_http_client() -> Client {
    Client::builder()
        .timeout(TOKEN_REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Performs the authenticate call against `base_url`.
pub(crate) async fn authenticate(
    http: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<Token> {
    let url = format!("{base_url}{AUTHENTICATE_PATH}");
    tracing::debug!(%username, "authenticating");
    let response = http
        .post(&url)
        .json(&LoginRequest { username, password })
        .send()
        .await
        .map_err(|e| transport_failure("authenticate", e))?;
    read_token(response, "authenticate").await
}

/// Reads a token response. The body is read as text before checking the
/// status so the server's reason survives into the error.
async fn read_token(response: Response, endpoint: &str) -> Result<Token> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_failure(endpoint, e))?;

    if !status.is_success() {
        return Err(HarnessError::Auth {
            status: Some(status),
            message: format!("{endpoint} returned {status}: {body}"),
            source: None,
        });
    }

    serde_json::from_str(&body).map_err(|e| HarnessError::Auth {
        status: Some(status),
        message: format!("failed to parse {endpoint} response"),
        source: Some(Box::new(e)),
    })
}

fn transport_failure(endpoint: &str, err: reqwest::Error) -> HarnessError {
    HarnessError::Auth {
        status: err.status(),
        message: format!("{endpoint} request failed"),
        source: Some(Box::new(err)),
    }
}

/// Logs in against the configured gateway and returns the raw token pair.
///
/// # Errors
///
/// `HarnessError::Auth` with `status == Some(401)` on bad credentials.
pub async fn login(config: &HarnessConfig, username: &str, password: &str) -> Result<Token> {
    authenticate(&token_http_client(), &config.base_url(), username, password).await
}

/// Exchanges a refresh token for a new token pair.
///
/// # Errors
///
/// `HarnessError::Auth` carrying the gateway status. TDEI answers 500 for
/// refresh tokens it cannot parse.
pub async fn refresh(config: &HarnessConfig, refresh_token: &str) -> Result<Token> {
    let url = format!("{}{REFRESH_TOKEN_PATH}", config.base_url());
    let response = token_http_client()
        .post(&url)
        .json(&refresh_token)
        .send()
        .await
        .map_err(|e| transport_failure("refresh-token", e))?;
    read_token(response, "refresh-token").await
}

/// Maps an access token to an `Authorization: Bearer <token>` header map.
pub fn auth_header(access_token: &str) -> Result<HeaderMap> {
    let value = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|e| {
        HarnessError::Auth {
            status: None,
            message: "access token is not a valid header value".to_string(),
            source: Some(Box::new(e)),
        }
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Decodes the claims segment of a JWT without verifying the signature.
///
/// Returns `None` if the token does not have three segments or the payload
/// is not base64url-encoded JSON.
pub fn parse_jwt(token: &str) -> Option<serde_json::Value> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Caches a TDEI access token and re-authenticates on demand.
///
/// Invariants:
/// - `response` is `None` until the first successful `refresh_token()`.
/// - `acquired_at` is `Some` whenever `response` is `Some`.
/// - A provider built with [`with_token`](Self::with_token) has no
///   credentials and therefore cannot refresh.
pub struct TokenProvider {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    response: Option<Token>,
    acquired_at: Option<Instant>,
}

impl TokenProvider {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        TokenProvider {
            client: token_http_client(),
            base_url: normalize_base_url(base_url),
            credentials: Some(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            response: None,
            acquired_at: None,
        }
    }

    /// Provider for the admin (system) account in `config`.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(&config.base_url(), config.username(), config.password())
    }

    /// Provider holding a pre-set token and no credentials. Used by tests and
    /// by suites that deliberately send a fixed (possibly bogus) token.
    pub fn with_token(token: &str) -> Self {
        TokenProvider {
            client: token_http_client(),
            base_url: String::new(),
            credentials: None,
            response: Some(Token {
                access_token: token.to_string(),
                refresh_token: String::new(),
                expires_in: None,
                refresh_expires_in: None,
                token_type: Some("Bearer".to_string()),
            }),
            acquired_at: Some(Instant::now()),
        }
    }

    /// Username this provider logs in as, if it has credentials.
    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    /// Whether [`refresh_token`](Self::refresh_token) can obtain a new token.
    pub fn can_refresh(&self) -> bool {
        self.credentials.is_some()
    }

    /// Logs in with the stored credentials and caches the result.
    pub async fn refresh_token(&mut self) -> Result<()> {
        let Some(creds) = self.credentials.clone() else {
            return Err(HarnessError::Auth {
                status: None,
                message: "token provider has no credentials to log in with".to_string(),
                source: None,
            });
        };

        let token =
            authenticate(&self.client, &self.base_url, &creds.username, &creds.password).await?;
        self.acquired_at = Some(Instant::now());
        self.response = Some(token);
        Ok(())
    }

    /// Drops the cached token so the next request logs in again.
    pub fn invalidate(&mut self) {
        self.response = None;
        self.acquired_at = None;
    }

    fn is_expired(&self) -> bool {
        match (&self.response, self.acquired_at) {
            (Some(resp), Some(acquired)) => match resp.expires_in {
                Some(expires_in) => {
                    let lifetime = expires_in.saturating_sub(EXPIRY_BUFFER_SECS);
                    acquired.elapsed().as_secs() >= lifetime
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Returns the cached access token, or `None` if absent or expired.
    pub fn token(&self) -> Option<&str> {
        if self.is_expired() {
            return None;
        }
        self.response.as_ref().map(|t| t.access_token.as_str())
    }

    /// Full cached token pair, including the refresh token.
    pub fn current(&self) -> Option<&Token> {
        self.response.as_ref()
    }
}
