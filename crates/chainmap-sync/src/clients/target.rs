//! HTTP client for the target map service.

use std::time::Duration;

use async_trait::async_trait;
use chainmap_core::errors::ErrorInfo;
use chainmap_core::{ChainError, MapSnapshot};
use chainmap_graph::Deletions;
use serde::{Deserialize, Serialize};

use crate::config::SyncConfig;

use super::{MapTarget, SubmitSummary};

/// Envelope the target wraps snapshot reads and submissions in.
#[derive(Debug, Serialize, Deserialize, Default)]
struct SnapshotEnvelope {
    #[serde(default)]
    data: MapSnapshot,
}

#[derive(Debug, Deserialize, Default)]
struct SubmitEnvelope {
    #[serde(default)]
    data: SubmitSummary,
}

/// Reqwest-backed [`MapTarget`] speaking the map's REST API: one
/// `/api/maps/{slug}/systems` resource handling GET, POST, and DELETE, with
/// bearer authentication.
pub struct HttpMapTarget {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpMapTarget {
    /// Creates a client from the loaded configuration.
    pub fn new(config: &SyncConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| transport_error("client-build", &err.to_string()))?;
        Ok(Self {
            http,
            endpoint: format!("{}/api/maps/{}/systems", config.map_url, config.map_slug),
            api_key: config.map_api_key.clone(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ChainError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| transport_error("request-failed", &err.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(
                transport_error("unexpected-status", "target returned a failure status")
                    .with_detail("status", status.as_str())
                    .with_detail("body", &body),
            );
        }
        Ok(body)
    }
}

#[async_trait]
impl MapTarget for HttpMapTarget {
    async fn current_map(&self) -> Result<MapSnapshot, ChainError> {
        let body = self.send(self.http.get(&self.endpoint)).await?;
        let envelope: SnapshotEnvelope = decode(&body)?;
        Ok(envelope.data)
    }

    async fn delete(&self, deletions: &Deletions) -> Result<(), ChainError> {
        self.send(self.http.delete(&self.endpoint).json(deletions))
            .await?;
        Ok(())
    }

    async fn submit(&self, snapshot: &MapSnapshot) -> Result<SubmitSummary, ChainError> {
        let envelope = SnapshotEnvelope {
            data: snapshot.clone(),
        };
        let body = self
            .send(self.http.post(&self.endpoint).json(&envelope))
            .await?;
        let response: SubmitEnvelope = decode(&body)?;
        Ok(response.data)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ChainError> {
    serde_json::from_str(body).map_err(|err| {
        ChainError::Serde(
            ErrorInfo::new("decode-failed", "target response did not decode")
                .with_context("error", err.to_string()),
        )
    })
}

fn transport_error(code: &str, message: &str) -> ChainError {
    ChainError::Transport(ErrorInfo::new(code, message))
}

trait DetailExt {
    fn with_detail(self, key: &str, value: &str) -> ChainError;
}

impl DetailExt for ChainError {
    fn with_detail(self, key: &str, value: &str) -> ChainError {
        match self {
            ChainError::Transport(info) => ChainError::Transport(info.with_context(key, value)),
            other => other,
        }
    }
}
