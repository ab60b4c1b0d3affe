//! HTTP client for the source signature inventory.

use std::time::Duration;

use async_trait::async_trait;
use chainmap_core::errors::ErrorInfo;
use chainmap_core::{ChainError, Signature, WormholeLink};
use serde::de::DeserializeOwned;

use crate::config::SyncConfig;

use super::ChainSource;

/// Reqwest-backed [`ChainSource`] speaking the inventory's query API:
/// `GET {base}?q=/wormholes&maskID=…` and `?q=/signatures&maskID=…` with
/// basic authentication.
pub struct HttpChainSource {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
    mask_id: String,
}

impl HttpChainSource {
    /// Creates a client from the loaded configuration.
    pub fn new(config: &SyncConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| transport_error("client-build", &err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.source_url.clone(),
            user: config.source_user.clone(),
            password: config.source_password.clone(),
            mask_id: config.source_mask_id.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, query: &str) -> Result<T, ChainError> {
        let url = format!("{}?q={}&maskID={}", self.base_url, query, self.mask_id);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await
            .map_err(|err| {
                transport_error("request-failed", &err.to_string()).with_endpoint(query)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                transport_error("unexpected-status", "source returned a failure status")
                    .with_endpoint(query)
                    .with_detail("status", status.as_str())
                    .with_detail("body", &body),
            );
        }
        response.json::<T>().await.map_err(|err| {
            ChainError::Serde(
                ErrorInfo::new("decode-failed", "source response did not decode")
                    .with_context("endpoint", query)
                    .with_context("error", err.to_string()),
            )
        })
    }
}

#[async_trait]
impl ChainSource for HttpChainSource {
    async fn wormhole_links(&self) -> Result<Vec<WormholeLink>, ChainError> {
        self.fetch("/wormholes").await
    }

    async fn signatures(&self) -> Result<Vec<Signature>, ChainError> {
        self.fetch("/signatures").await
    }
}

fn transport_error(code: &str, message: &str) -> ChainError {
    ChainError::Transport(ErrorInfo::new(code, message))
}

trait DetailExt {
    fn with_endpoint(self, endpoint: &str) -> ChainError;
    fn with_detail(self, key: &str, value: &str) -> ChainError;
}

impl DetailExt for ChainError {
    fn with_endpoint(self, endpoint: &str) -> ChainError {
        self.with_detail("endpoint", endpoint)
    }

    fn with_detail(self, key: &str, value: &str) -> ChainError {
        match self {
            ChainError::Transport(info) => ChainError::Transport(info.with_context(key, value)),
            other => other,
        }
    }
}
