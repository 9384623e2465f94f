//! Typed error hierarchy for the tdei-harness crate.
//!
//! `HarnessError` covers every failure a single API call or configuration
//! step can produce. Each variant maps to a real boundary:
//! - `Config` covers the local `test-harness.json` settings file.
//! - `Auth` covers the authenticate and refresh-token endpoints.
//! - `Api` covers every other TDEI endpoint and keeps the response body, so
//!   validation messages from the server survive into test failures.
//! - `Network` and `Parse` wrap transport and deserialization failures.
//!
//! Tests pattern-match on HTTP status through [`HarnessError::status`], which
//! is the Rust counterpart of asserting `{ response: { status: 401 } }`.
//!
//! Seeding has its own error type, [`SeedError`], because a failed
//! provisioning run is memoized and shared between concurrent callers, which
//! requires `Clone`.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;

/// Unified error type for client, auth, and configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The harness settings file is missing, unreadable, or malformed.
    #[error("invalid harness configuration {path}: {message}")]
    Config {
        /// Path of the settings file that was read.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// Authentication failure at the authenticate or refresh-token endpoint.
    ///
    /// `status` is set when the server answered; it is `None` when no
    /// credentials were available to log in with at all.
    #[error("authentication failed: {message}")]
    Auth {
        /// HTTP status returned by the auth endpoint, if any.
        status: Option<StatusCode>,
        /// Human-readable description including the server's error body.
        message: String,
        /// The underlying transport or parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The TDEI API returned a non-success HTTP status code.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code returned by the API.
        status: StatusCode,
        /// The raw response body text (may be empty).
        body: String,
    },

    /// JSON deserialization of a response body failed.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// DNS, TCP, TLS, or timeout failure with no HTTP status available.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HarnessError {
    /// Returns the HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HarnessError::Api { status, .. } => Some(*status),
            HarnessError::Auth { status, .. } => *status,
            HarnessError::Network(err) => err.status(),
            HarnessError::Config { .. } | HarnessError::Parse(_) => None,
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failure of the seed-data lifecycle.
///
/// Cloneable so one memoized outcome can be handed to every caller that
/// awaited the same provisioning run. Inner errors are shared via `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeedError {
    /// Logging in as the admin account failed; nothing was created.
    #[error("seeding failed: could not authenticate as {username}: {source}")]
    Auth {
        /// The admin username from the harness configuration.
        username: String,
        #[source]
        source: Arc<HarnessError>,
    },

    /// A creation, registration, or role-assignment call failed.
    #[error("seeding failed while trying to {step}: {source}")]
    Provision {
        /// The provisioning step that failed, e.g. `"create organization"`.
        step: &'static str,
        #[source]
        source: Arc<HarnessError>,
    },

    /// The cache exists but cannot be used (bad JSON, wrong schema version).
    #[error("seed cache {path} is corrupt: {reason}")]
    CacheCorrupt {
        /// Location of the cache.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The cache could not be read or written.
    #[error("seed cache {path} is not accessible: {source}")]
    CacheIo {
        /// Location of the cache.
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl SeedError {
    pub(crate) fn provision(step: &'static str, source: HarnessError) -> Self {
        SeedError::Provision {
            step,
            source: Arc::new(source),
        }
    }

    /// Returns the HTTP status of the remote failure behind this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SeedError::Auth { source, .. } | SeedError::Provision { source, .. } => source.status(),
            SeedError::CacheCorrupt { .. } | SeedError::CacheIo { .. } => None,
        }
    }
}
