//! Google Safe Browsing v4 lookup client.
//!
//! Sends `threatMatches:find` requests for a single URL. An empty response
//! object means the URL is not listed.
//!
//! # Failure Handling
//!
//! - Every request is bounded by the configured timeout
//! - Timeouts, connection errors, `429` and `5xx` responses are retried with
//!   jittered exponential backoff, up to the configured retry budget
//! - Other `4xx` responses (bad API key, malformed request) fail immediately
//!
//! All failures surface as [`ComputationError::UpstreamUnavailable`]. The API
//! key travels in a header and error text is stripped of request URLs.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::computation::ComputationError;
use crate::domain::entities::ReputationVerdict;
use crate::domain::reputation::ReputationProvider;

/// Public Safe Browsing lookup endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://safebrowsing.googleapis.com/v4/threatMatches:find";

/// Header carrying the API key, so it never appears in a request URL.
const API_KEY_HEADER: &str = "X-Goog-Api-Key";

const THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

/// Errors from a single Safe Browsing request.
#[derive(Debug, thiserror::Error)]
pub enum ReputationClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl From<reqwest::Error> for ReputationClientError {
    fn from(e: reqwest::Error) -> Self {
        // Error text must never carry the request URL.
        Self::Transport(e.without_url())
    }
}

impl ReputationClientError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Build(_) => false,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}

/// Connection settings for [`SafeBrowsingClient`].
#[derive(Debug, Clone)]
pub struct SafeBrowsingSettings {
    pub api_key: String,
    pub endpoint: String,
    pub client_id: String,
    pub timeout: Duration,
    /// Extra attempts after the first one fails transiently.
    pub retries: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'a [&'a str],
    platform_types: [&'a str; 1],
    threat_entry_types: [&'a str; 1],
    threat_entries: [ThreatEntry<'a>; 1],
}

#[derive(Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Deserialize, Default)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: String,
}

/// HTTP client for the Safe Browsing lookup API.
pub struct SafeBrowsingClient {
    http: reqwest::Client,
    settings: SafeBrowsingSettings,
}

impl SafeBrowsingClient {
    /// Builds a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ReputationClientError::Build`] if the HTTP client cannot be created.
    pub fn new(settings: SafeBrowsingSettings) -> Result<Self, ReputationClientError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReputationClientError::Build(e.to_string()))?;

        Ok(Self { http, settings })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    /// Sends one lookup request without retrying.
    async fn query_once(&self, url: &str) -> Result<ReputationVerdict, ReputationClientError> {
        let body = FindRequest {
            client: ClientInfo {
                client_id: &self.settings.client_id,
                client_version: env!("CARGO_PKG_VERSION"),
            },
            threat_info: ThreatInfo {
                threat_types: THREAT_TYPES,
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: [ThreatEntry { url }],
            },
        };

        let response = self
            .http
            .post(&self.settings.endpoint)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReputationClientError::Status { status, body });
        }

        let found: FindResponse = response.json().await?;
        Ok(ReputationVerdict::from_threats(
            found.matches.into_iter().map(|m| m.threat_type),
        ))
    }
}

#[async_trait]
impl ReputationProvider for SafeBrowsingClient {
    async fn lookup(&self, url: &str) -> Result<ReputationVerdict, ComputationError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .max_delay(Duration::from_millis(500))
            .map(jitter)
            .take(self.settings.retries);

        let verdict = RetryIf::spawn(
            strategy,
            || async {
                let result = self.query_once(url).await;
                if let Err(e) = &result {
                    warn!("Safe Browsing query failed: {}", e);
                }
                result
            },
            |e: &ReputationClientError| e.is_transient(),
        )
        .await
        .map_err(|e| ComputationError::UpstreamUnavailable(e.to_string()))?;

        debug!("Safe Browsing verdict for {}: {:?}", url, verdict);
        Ok(verdict)
    }
}
