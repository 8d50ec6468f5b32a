//! Wire types for the engine API
//!
//! The engine speaks line-delimited JSON on its streaming endpoints (pull,
//! generate); list/version endpoints return plain JSON bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A model known to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineModel {
    /// Model tag (e.g. "qwen2.5:0.5b")
    pub name: String,

    /// Model size in bytes
    #[serde(default)]
    pub size: u64,

    /// Last modification time
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,

    /// Model digest/hash
    #[serde(default)]
    pub digest: String,
}

/// Response from the engine's tags endpoint
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    pub models: Vec<EngineModel>,
}

/// Response from the engine's version endpoint
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// One line of the streamed pull response
#[derive(Debug, Clone, Deserialize)]
pub struct PullEvent {
    /// Stage message ("pulling manifest", "downloading ...", "success")
    pub status: String,

    /// Total bytes for the current layer
    #[serde(default)]
    pub total: Option<u64>,

    /// Bytes completed for the current layer
    #[serde(default)]
    pub completed: Option<u64>,
}

impl PullEvent {
    /// Map byte counters onto an integer percentage
    pub fn percent(&self) -> Option<u8> {
        match (self.completed, self.total) {
            (Some(completed), Some(total)) if total > 0 => {
                Some(((completed * 100) / total).min(100) as u8)
            }
            _ => None,
        }
    }

    /// True once the engine reports the pull finished
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Download progress reported by an initialize task
///
/// One value per observed pull event: an integer percentage and the stage
/// the engine reported it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitProgress {
    /// Percent complete, 0-100
    pub percent: u8,
    /// Engine stage message
    pub stage: String,
}

impl InitProgress {
    /// Build progress from a pull event, carrying the last known percent
    /// through events that have no byte counters
    pub fn from_event(event: &PullEvent, last_percent: u8) -> Self {
        InitProgress {
            percent: event.percent().unwrap_or(last_percent),
            stage: event.status.clone(),
        }
    }
}

impl fmt::Display for InitProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% ({})", self.percent, self.stage)
    }
}

/// Generate request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// One line of the streamed generate response
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    /// Token text for this chunk
    #[serde(default)]
    pub response: String,

    /// True on the terminal chunk
    #[serde(default)]
    pub done: bool,
}

/// Pull request body
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    pub name: String,
    pub stream: bool,
}

/// Format bytes into human-readable size
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base: f64 = 1024.0;
    let exponent = (bytes as f64).log(base).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    let size = bytes as f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}
