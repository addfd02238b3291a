//! In-process request channel between the UI side and the backend task.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};

use super::backend::ConsoleBackend;
use super::types::{Request, Response};
use crate::telemetry::TelemetrySource;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("console backend has shut down")]
    Closed,

    #[error("console backend dropped the request")]
    Dropped,
}

struct Envelope {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Cloneable sender side of the channel. The backend task stops once every
/// handle is dropped and in-flight requests have completed.
#[derive(Clone)]
pub struct ConsoleHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ConsoleHandle {
    /// Send a request and wait for its response.
    pub async fn invoke(&self, request: Request) -> Result<Response, ChannelError> {
        let (reply, response_rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| ChannelError::Closed)?;
        response_rx.await.map_err(|_| ChannelError::Dropped)
    }
}

/// Start the backend task. Each request runs on its own task so a slow
/// query does not hold up the others.
pub fn spawn<T>(backend: ConsoleBackend<T>, capacity: usize) -> (ConsoleHandle, JoinHandle<()>)
where
    T: TelemetrySource + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(run(Arc::new(backend), rx));
    (ConsoleHandle { tx }, task)
}

async fn run<T>(backend: Arc<ConsoleBackend<T>>, mut rx: mpsc::Receiver<Envelope>)
where
    T: TelemetrySource + 'static,
{
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            envelope = rx.recv() => {
                let Some(Envelope { request, reply }) = envelope else {
                    break;
                };
                let backend = Arc::clone(&backend);
                in_flight.spawn(async move {
                    let name = request.name();
                    let response = backend.handle(request).await;
                    if reply.send(response).is_err() {
                        debug!(request = name, "Caller went away before the response");
                    }
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    while in_flight.join_next().await.is_some() {}
    info!("Console backend stopped");
}
