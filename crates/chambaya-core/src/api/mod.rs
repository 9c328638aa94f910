//! HTTP client for the ChambaYa backend.
//!
//! One [`ApiClient`] is shared by every feature. It reads the bearer token
//! from the [`SessionStore`] on each request, so a login or logout takes
//! effect immediately without rebuilding the client.

mod auth;
mod error;
mod notifications;
mod ratings;
mod works;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chambaya_types::ApiEnvelope;
use reqwest::multipart::Part;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use notifications::DEFAULT_CLEAN_DAYS;

use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Built-in API root, used when neither env nor config override it.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Environment variable overriding the API root.
pub const BASE_URL_ENV: &str = "CHAMBAYA_API_URL";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("chambaya/", env!("CARGO_PKG_VERSION"));

/// Resolves the API root with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the selected value is not a valid URL.
pub fn resolve_base_url(config: &ApiConfig) -> Result<String> {
    if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config.base_url.as_deref() {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}

/// Client for the ChambaYa REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            session,
        })
    }

    /// Client for the configured API root and timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = resolve_base_url(config)?;
        Self::new(base_url, config.timeout(), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Starts a request, attaching the session token when one is held.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and decodes the JSON body as `T`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| {
            let err = ApiError::transport(&e);
            tracing::warn!(kind = %err.kind, "api request failed");
            err
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(&e))?;

        if !status.is_success() {
            let err = ApiError::http_status(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), message = %err.message, "api error response");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::parse(&e, &body))
    }

    /// Sends a request answered with `{ok, data?, message?}`.
    ///
    /// `ok: false` becomes an [`ApiErrorKind::Api`] error carrying `message`.
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<Option<T>> {
        let envelope: ApiEnvelope<T> = self.send(request).await?;
        if !envelope.ok {
            return Err(ApiError::api(envelope.message.as_deref()));
        }
        Ok(envelope.data)
    }
}

/// Reads a local image into a multipart part named after the file.
async fn image_part(path: &Path) -> ApiResult<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::request(format!("Failed to read {}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))
        .map_err(|e| ApiError::request(format!("Invalid upload for {}: {e}", path.display())))
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
