use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::entities::{Endpoint, FailureReporter};
use crate::error::HarnessError;

/// How long a graceful shutdown may take before the serve task is aborted
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Trait for HTTP listener implementations
#[async_trait]
pub trait Server: Send + Sync {
    /// Bind the listener and start serving `endpoints` in the background.
    ///
    /// Each endpoint's `handle` must be bound to its method and path. Requests
    /// matching no endpoint are reported to `reporter` and answered with 404,
    /// or 405 when the path exists under another method.
    async fn start(
        &self,
        endpoints: Vec<Arc<Endpoint>>,
        reporter: FailureReporter,
    ) -> Result<ServerHandle, HarnessError>;
}

/// A running listener.
///
/// Shutting down is idempotent, and dropping the handle stops the listener
/// if it is still running.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), HarnessError>>>,
}

impl ServerHandle {
    pub fn new(
        addr: SocketAddr,
        shutdown_tx: oneshot::Sender<()>,
        task: JoinHandle<Result<(), HarnessError>>,
    ) -> Self {
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Address the listener is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for the listener to close
    pub async fn shutdown(&mut self) -> Result<(), HarnessError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let Some(mut task) = self.task.take() else {
            return Ok(());
        };

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await {
            Ok(Ok(result)) => {
                tracing::info!(addr = %self.addr, "mock server stopped");
                result
            }
            Ok(Err(e)) => Err(HarnessError::ServerError(e.to_string())),
            Err(_) => {
                tracing::warn!(addr = %self.addr, "graceful shutdown timed out, aborting");
                task.abort();
                Ok(())
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
