//! Engine API client
//!
//! An explicitly constructed handle for the local inference engine. There is
//! no process-wide singleton: callers build a client from configuration and
//! pass it around; clones share the underlying HTTP pool.

use crate::config::Config;
use crate::errors::{BenchError, Result};
use crate::sdk::init::InitTask;
use crate::sdk::types::{
    EngineModel, GenerateChunk, GenerateRequest, PullEvent, PullRequest, TagsResponse,
    VersionResponse,
};
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;

/// Version string of this SDK surface
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request timeout; generous because pulls move gigabytes
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for cheap liveness probes
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Engine client handle
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: Client,
    base_url: String,
    model: String,
}

impl EngineClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_config(&config.engine_url(), &config.engine.model)
    }

    /// Create a client with explicit endpoint and model tag
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BenchError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }

    /// Version of the client-side SDK surface
    pub fn sdk_version(&self) -> &'static str {
        SDK_VERSION
    }

    /// Version reported by the engine daemon
    pub async fn engine_version(&self) -> Result<String> {
        let url = format!("{}/api/version", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BenchError::EngineApi(format!("Failed to query version: {}", e)))?;

        if !response.status().is_success() {
            return Err(BenchError::EngineApi(format!(
                "Version endpoint returned {}",
                response.status()
            )));
        }

        let version: VersionResponse = response
            .json()
            .await
            .map_err(|e| BenchError::EngineApi(format!("Failed to parse version: {}", e)))?;

        Ok(version.version)
    }

    /// Check if the engine daemon is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        self.client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// List models installed on the engine
    pub async fn list_models(&self) -> Result<Vec<EngineModel>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BenchError::EngineApi(format!("Failed to list models: {}", e)))?;

        if !response.status().is_success() {
            return Err(BenchError::EngineApi(format!(
                "Tags endpoint returned {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| BenchError::EngineApi(format!("Failed to parse models: {}", e)))?;

        Ok(tags.models)
    }

    /// Readiness query: true iff the configured model is installed
    ///
    /// Network failures degrade to `false`; the caller only needs a gate for
    /// generation, not a diagnosis.
    pub async fn is_ready(&self) -> bool {
        match self.list_models().await {
            Ok(models) => models.iter().any(|m| m.name == self.model),
            Err(_) => false,
        }
    }

    /// Start the asynchronous initialize (model download) operation
    ///
    /// Returns a task handle owning the progress stream and the terminal
    /// result; see [`InitTask`].
    pub fn initialize(&self) -> InitTask {
        InitTask::spawn(self.clone())
    }

    /// Pull the configured model, reporting each streamed event
    ///
    /// Internal primitive behind [`EngineClient::initialize`]; the observer
    /// feeds the init task's progress channel.
    pub(crate) async fn pull_model_with<F>(&self, mut observe: F) -> Result<()>
    where
        F: FnMut(PullEvent),
    {
        let url = format!("{}/api/pull", self.base_url);

        let request = PullRequest {
            name: self.model.clone(),
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BenchError::EngineApi(format!("Failed to start pull: {}", e)))?;

        if !response.status().is_success() {
            return Err(BenchError::EngineApi(format!(
                "Pull endpoint returned {}",
                response.status()
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut finished = false;

        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|e| BenchError::Streaming(e.to_string()))?;
            buffer.extend_from_slice(&chunk);

            // Events arrive as newline-delimited JSON; a chunk may end
            // mid-line, so carry the tail over to the next chunk.
            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if let Some(error) = parse_event_error(&line) {
                    return Err(BenchError::EngineApi(error));
                }
                if let Ok(event) = serde_json::from_slice::<PullEvent>(&line) {
                    finished = finished || event.is_success();
                    observe(event);
                }
            }
        }

        // Trailing line without newline
        if !buffer.is_empty() {
            if let Ok(event) = serde_json::from_slice::<PullEvent>(&buffer) {
                finished = finished || event.is_success();
                observe(event);
            }
        }

        if !finished {
            return Err(BenchError::Streaming(
                "Pull stream ended without a success event".to_string(),
            ));
        }

        Ok(())
    }

    /// Generate a response for a prompt
    ///
    /// Streams tokens from the engine and resolves to the accumulated
    /// response text; one result per call.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BenchError::EngineApi(format!("Failed to send prompt: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BenchError::EngineApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut output = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|e| BenchError::Streaming(e.to_string()))?;
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if let Some(error) = parse_event_error(&line) {
                    return Err(BenchError::EngineApi(error));
                }
                if let Ok(token) = serde_json::from_slice::<GenerateChunk>(&line) {
                    output.push_str(&token.response);
                    if token.done {
                        return Ok(output);
                    }
                }
            }
        }

        if !buffer.is_empty() {
            if let Ok(token) = serde_json::from_slice::<GenerateChunk>(&buffer) {
                output.push_str(&token.response);
            }
        }

        Ok(output)
    }

    /// Model tag this client initializes and generates with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Engine base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Extract an error message from a pull event line, if the engine sent one
fn parse_event_error(line: &[u8]) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorLine {
        error: String,
    }
    serde_json::from_slice::<ErrorLine>(line)
        .ok()
        .map(|e| e.error)
}
