use std::time::Duration;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// How long each background task gets to finish after the stop signal
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Graceful shutdown coordinator for the emulator's background tasks
pub struct GracefulShutdown {
    shutdown_tx: broadcast::Sender<()>,
    tasks: Mutex<Vec<BackgroundTask>>,
}

/// A spawned task that stops when the shutdown signal is broadcast
struct BackgroundTask {
    name: String,
    handle: JoinHandle<()>,
}

impl GracefulShutdown {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            shutdown_tx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Get a shutdown receiver for tasks to listen on
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Register a task to be joined during shutdown
    pub async fn register_task(&self, name: impl Into<String>, handle: JoinHandle<()>) {
        self.tasks.lock().await.push(BackgroundTask {
            name: name.into(),
            handle,
        });
    }

    /// Signal every subscriber and wait for registered tasks to finish
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("No task was listening for the shutdown signal: {}", e);
        }

        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            match timeout(TASK_SHUTDOWN_TIMEOUT, task.handle).await {
                Ok(Ok(())) => {
                    info!("Task '{}' shut down successfully", task.name);
                }
                Ok(Err(e)) => {
                    error!("Task '{}' panicked: {}", task.name, e);
                }
                Err(_) => {
                    warn!("Task '{}' shutdown timed out", task.name);
                }
            }
        }

        info!("Graceful shutdown completed");
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::new()
    }
}
