//! HTTP client for the Greenora marketplace backend.
//!
//! Endpoints:
//! - `GET  /api/users/{uid}`  user profile (enveloped)
//! - `POST /api/users/sync`   create/update a profile after registration (enveloped)
//! - `GET  /api/plants`       catalog (bare JSON array)
//! - `POST /api/quotes/submit` quote request (enveloped)

use std::time::Duration;

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use greenora_core::config::BackendConfig;
use greenora_core::types::{
    CatalogPlant, Envelope, QuotePayload, SyncUserRequest, UserPayload, UserProfile,
};

use crate::error::ClientError;
use crate::quote::QuoteSubmission;

/// Message used when the backend fails without saying why.
const DEFAULT_FAILURE: &str = "Submission failed";

#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    base_url: String,
    client: Client,
}

impl MarketplaceClient {
    /// Create with an explicit base URL and per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientError> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "Backend request");
        Ok(self.client.request(method, url))
    }

    /// Reject non-2xx responses, keeping the body for diagnostics.
    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status { status, body })
        }
    }

    /// Decode a `{ success, error?, ...payload }` envelope.
    async fn handle_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let envelope: Envelope<T> = Self::check_status(response).await?.json().await?;
        if envelope.success {
            Ok(envelope.payload)
        } else {
            Err(ClientError::Application(
                envelope
                    .error
                    .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            ))
        }
    }

    // ============================================================
    // Users
    // ============================================================

    /// Fetch a user profile by identity-provider uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, ClientError> {
        let response = self
            .request(Method::GET, &["api", "users", uid])?
            .send()
            .await?;
        let payload: UserPayload = Self::handle_envelope(response).await?;
        Ok(payload.user)
    }

    /// Create or update the backend profile for a freshly registered user.
    pub async fn sync_user(
        &self,
        request: &SyncUserRequest,
    ) -> Result<Option<UserProfile>, ClientError> {
        let response = self
            .request(Method::POST, &["api", "users", "sync"])?
            .json(request)
            .send()
            .await?;
        let payload: UserPayload = Self::handle_envelope(response).await?;
        Ok(payload.user)
    }

    // ============================================================
    // Catalog
    // ============================================================

    pub async fn list_plants(&self) -> Result<Vec<CatalogPlant>, ClientError> {
        let response = self.request(Method::GET, &["api", "plants"])?.send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    // ============================================================
    // Quotes
    // ============================================================

    /// Submit a quote request. Returns the backend's quote id, if it issued one.
    pub async fn submit_quote(
        &self,
        submission: &QuoteSubmission,
    ) -> Result<Option<String>, ClientError> {
        let response = self
            .request(Method::POST, &["api", "quotes", "submit"])?
            .json(submission)
            .send()
            .await?;
        let payload: QuotePayload = Self::handle_envelope(response).await?;
        Ok(payload.quote_id)
    }
}
