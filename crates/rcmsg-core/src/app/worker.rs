//! WorkerGroup - enriches and dispatches messages on N tokio tasks.
//!
//! Each message is owned by exactly one worker while it is processed, so
//! the message itself needs no locking; only the shared inbox is guarded.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::dispatcher::{DispatchReport, Dispatcher};
use super::enricher::Enricher;
use crate::domain::Details;
use crate::error::RcError;
use crate::message::Message;

/// What every worker asks for and how often it retries a failed fetch.
///
/// Retries happen immediately: anything smarter (backoff, deferral) belongs
/// to a scheduler in front of the group.
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
    pub properties: Vec<String>,
    pub interested: Vec<String>,
    pub max_retries: u32,
}

/// Shared parts handed to every worker.
pub struct WorkerContext<D: Details> {
    pub enricher: Enricher,
    pub dispatcher: Dispatcher<D>,
    pub config: WorkerConfig,
}

/// A message leaving the group, settled or given up on.
pub struct Processed<D: Details> {
    pub message: Message<D>,
    pub outcome: Result<DispatchReport, RcError>,
}

/// Worker group handle.
/// - `request_shutdown` stops workers from taking new messages
/// - closing the inbox lets workers drain it and exit on their own
/// - `join` / `shutdown_and_join` wait for every worker
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn `n` workers reading from `inbox` and writing to `outbox`.
    pub fn spawn<D: Details>(
        n: usize,
        inbox: mpsc::Receiver<Message<D>>,
        outbox: mpsc::Sender<Processed<D>>,
        context: Arc<WorkerContext<D>>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let inbox = Arc::new(Mutex::new(inbox));

        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let inbox = Arc::clone(&inbox);
            let outbox = outbox.clone();
            let ctx = Arc::clone(&context);
            let mut rx = shutdown_rx.clone();

            let join = tokio::spawn(async move {
                worker_loop(worker_id, inbox, outbox, ctx, &mut rx).await;
            });
            joins.push(join);
        }

        Self { shutdown_tx, joins }
    }

    /// Request shutdown for all workers.
    /// In-flight messages are finished; no new ones are taken.
    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all workers to exit (inbox closed and drained, or shutdown).
    pub async fn join(self) {
        for j in self.joins {
            let _ = j.await;
        }
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        self.join().await;
    }
}

async fn worker_loop<D: Details>(
    worker_id: usize,
    inbox: Arc<Mutex<mpsc::Receiver<Message<D>>>>,
    outbox: mpsc::Sender<Processed<D>>,
    ctx: Arc<WorkerContext<D>>,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let next = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    // group handle dropped
                    break;
                }
                continue;
            }
            next = async { inbox.lock().await.recv().await } => next,
        };

        let Some(mut message) = next else {
            debug!(worker_id, "inbox closed");
            break;
        };

        let outcome = process(worker_id, &ctx, &mut message).await;
        if outbox.send(Processed { message, outcome }).await.is_err() {
            debug!(worker_id, "outbox closed");
            break;
        }
    }
}

async fn process<D: Details>(
    worker_id: usize,
    ctx: &WorkerContext<D>,
    message: &mut Message<D>,
) -> Result<DispatchReport, RcError> {
    let mut outcome = ctx
        .enricher
        .enrich(
            message,
            ctx.config.properties.iter().cloned(),
            ctx.config.interested.iter().cloned(),
        )
        .await
        .map_err(RcError::from);

    while let Err(err) = &outcome {
        if message.retries() >= ctx.config.max_retries || !message.state().is_retryable() {
            break;
        }
        warn!(worker_id, retries = message.retries(), %err, "fetch failed, retrying");
        outcome = ctx.enricher.retry(message).await;
    }
    outcome?;

    ctx.dispatcher.dispatch(message).await
}
