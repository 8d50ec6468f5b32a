//! Initialize task: model download with explicit progress and completion
//!
//! One spawned task per initialize call, with one bounded progress channel
//! and one terminal result: progress values arrive through `next_progress`
//! until the channel closes, then `join` resolves with success or the
//! captured error. Cancellation is explicit via `abort`.

use crate::errors::{BenchError, Result};
use crate::sdk::client::EngineClient;
use crate::sdk::types::InitProgress;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Progress channel capacity
///
/// Bounded so a slow consumer cannot grow memory; excess events are dropped,
/// which only coarsens the displayed percentage. The terminal result never
/// travels through this channel.
const PROGRESS_CAPACITY: usize = 100;

/// Handle to a running initialize (model download) operation
pub struct InitTask {
    progress: mpsc::Receiver<InitProgress>,
    handle: JoinHandle<Result<()>>,
}

impl InitTask {
    /// Spawn the download on the runtime and return its handle
    pub(crate) fn spawn(client: EngineClient) -> Self {
        let (tx, rx) = mpsc::channel(PROGRESS_CAPACITY);

        let handle = tokio::spawn(async move {
            let mut last_percent = 0u8;
            client
                .pull_model_with(|event| {
                    let update = InitProgress::from_event(&event, last_percent);
                    last_percent = update.percent;
                    let _ = tx.try_send(update);
                })
                .await
        });

        InitTask {
            progress: rx,
            handle,
        }
    }

    /// Receive the next progress update
    ///
    /// Resolves to `None` once the download finished (either way) and all
    /// buffered updates were consumed; after that `join` yields the result.
    pub async fn next_progress(&mut self) -> Option<InitProgress> {
        self.progress.recv().await
    }

    /// Await the terminal result of the download
    pub async fn join(self) -> Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                Err(BenchError::Streaming("Initialize task cancelled".to_string()))
            }
            Err(e) => Err(BenchError::Generic(format!("Initialize task panicked: {}", e))),
        }
    }

    /// Cancel the download
    ///
    /// The progress channel closes and `join` reports the cancellation.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> EngineClient {
        // Port 1 refuses connections immediately
        EngineClient::with_config("http://127.0.0.1:1", "qwen2.5:0.5b").unwrap()
    }

    #[tokio::test]
    async fn test_failed_initialize_reports_through_join() {
        let mut task = unreachable_client().initialize();

        // Channel closes without any progress once the task fails
        assert!(task.next_progress().await.is_none());

        let result = task.join().await;
        assert!(matches!(result, Err(BenchError::EngineApi(_))));
    }

    #[tokio::test]
    async fn test_abort_is_reported_as_cancellation() {
        let task = unreachable_client().initialize();
        task.abort();

        match task.join().await {
            // Either the abort landed first or the connection already failed
            Err(BenchError::Streaming(msg)) => assert!(msg.contains("cancelled")),
            Err(BenchError::EngineApi(_)) => {}
            Ok(()) => panic!("Aborted initialize must not report success"),
            Err(other) => panic!("Unexpected join error: {}", other),
        }
    }

    #[tokio::test]
    #[ignore] // Requires a running engine
    async fn test_initialize_integration() {
        let client = EngineClient::with_config("http://127.0.0.1:11434", "qwen2.5:0.5b").unwrap();
        let mut task = client.initialize();

        let mut last = 0u8;
        while let Some(update) = task.next_progress().await {
            assert!(update.percent <= 100);
            last = update.percent;
        }
        task.join().await.unwrap();
        assert_eq!(last, 100);
    }
}
