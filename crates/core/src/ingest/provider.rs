use crate::config::{parse_var, Settings};
use crate::ingest::types::{LoadedSnapshot, SnapshotResponse};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/v1/stock_snapshot";
const DEFAULT_RETRIES: u32 = 3;

/// Source of the per-symbol attribute snapshot the engine scores.
#[async_trait::async_trait]
pub trait SnapshotProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_snapshot(&self) -> Result<LoadedSnapshot>;
}

/// Reads a [`SnapshotResponse`] JSON document from disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.require_snapshot_path()?))
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    fn provider_name(&self) -> &'static str {
        "file_json"
    }

    async fn fetch_snapshot(&self) -> Result<LoadedSnapshot> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read snapshot file {}", self.path.display()))?;
        let parsed = serde_json::from_str::<SnapshotResponse>(&text)
            .with_context(|| format!("snapshot file {} is not a valid snapshot", self.path.display()))?;
        parsed.into_loaded()
    }
}

#[derive(Debug, Clone)]
pub struct HttpJsonSnapshotProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
    retries: u32,
}

impl HttpJsonSnapshotProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_data_provider_base_url()?.to_string();
        let api_key = settings.data_provider_api_key.clone();

        let timeout_secs = parse_var("DATA_PROVIDER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        let retries = parse_var("DATA_PROVIDER_RETRIES", DEFAULT_RETRIES).max(1);

        let path = std::env::var("DATA_PROVIDER_SNAPSHOT_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build data provider http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            path,
            retries,
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once(&self) -> Result<SnapshotResponse> {
        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .send()
            .await
            .context("data provider request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read provider response")?;

        if !status.is_success() {
            anyhow::bail!("data provider HTTP {status}: {text}");
        }

        serde_json::from_str::<SnapshotResponse>(&text)
            .with_context(|| format!("failed to parse provider response into SnapshotResponse: {text}"))
    }
}

const MAX_BACKOFF_EXPONENT: u32 = 5;

/// 1s, 2s, 4s, ... capped at 32s.
fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT))
}

#[async_trait::async_trait]
impl SnapshotProvider for HttpJsonSnapshotProvider {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn fetch_snapshot(&self) -> Result<LoadedSnapshot> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(parsed) => return parsed.into_loaded(),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = retry_backoff(attempt);
                    tracing::warn!(attempt, ?backoff, error = %err, "snapshot fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
