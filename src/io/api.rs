//! HTTP client for the project-management service.
//!
//! Every call takes a [`CancellationToken`] and races it against the
//! request, so a closed window or a superseded load stops waiting at the
//! fetch boundary instead of checking flags in every callback.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::payload::{Envelope, RawProject, User};
use crate::config::Settings;

pub const TOTAL_DETAIL_PATH: &str = "/api/project/totalDetail";
pub const USER_LIST_PATH: &str = "/api/user/list";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("response carried no data")]
    EmptyResponse,
    #[error("invalid session cookie")]
    InvalidCookie,
    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = settings.session_cookie.as_deref().filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(cookie).map_err(|_| ApiError::InvalidCookie)?;
            headers.insert(COOKIE, value);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/project/totalDetail`.
    pub async fn fetch_projects(&self, cancel: &CancellationToken) -> Result<Vec<RawProject>, ApiError> {
        self.get(TOTAL_DETAIL_PATH, cancel).await
    }

    /// `GET /api/user/list`.
    pub async fn fetch_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, ApiError> {
        self.get(USER_LIST_PATH, cancel).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, cancel: &CancellationToken) -> Result<T, ApiError> {
        let url = self.url(path);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%url, "request cancelled");
                Err(ApiError::Cancelled)
            }
            result = self.send(&url) => result,
        }
    }

    async fn send<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let envelope: Envelope<T> = response.json().await?;
        unwrap_envelope(envelope)
    }
}

/// Split the service envelope into data or a server error.
pub fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
    if let Some(err) = envelope.err.filter(|e| !e.is_empty()) {
        return Err(ApiError::Server(err));
    }
    envelope.data.ok_or(ApiError::EmptyResponse)
}
