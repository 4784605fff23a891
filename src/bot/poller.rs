//! Long-poll run loop.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use super::Dispatcher;
use crate::transport::wire::Update;
use crate::transport::{TelegramClient, TransportError};

/// Source of inbound updates.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Wait for updates with an id of at least `offset`.
    async fn next_batch(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError>;
}

/// Long polling against the Bot API.
pub struct LongPoll {
    client: Arc<TelegramClient>,
    timeout_secs: u64,
}

impl LongPoll {
    pub fn new(client: Arc<TelegramClient>, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }
}

#[async_trait]
impl UpdateSource for LongPoll {
    async fn next_batch(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        self.client.get_updates(offset, self.timeout_secs).await
    }
}

/// Poll `source` and dispatch every update on its own task until `shutdown`
/// completes, then give in-flight updates up to `drain_timeout` to finish.
///
/// A failing or panicking handler never stops the loop. Returns the number
/// of updates dispatched.
pub async fn run<S, F>(
    source: &S,
    dispatcher: Arc<Dispatcher>,
    backoff: Duration,
    drain_timeout: Duration,
    shutdown: F,
) -> u64
where
    S: UpdateSource + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;
    let mut dispatched = 0u64;
    let mut in_flight = JoinSet::new();

    tracing::info!("Polling for updates");

    loop {
        let batch = tokio::select! {
            _ = &mut shutdown => break,
            batch = source.next_batch(offset) => batch,
        };

        while let Some(finished) = in_flight.try_join_next() {
            log_join_failure(finished);
        }

        match batch {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    dispatched += 1;

                    let dispatcher = Arc::clone(&dispatcher);
                    in_flight.spawn(async move {
                        dispatcher.dispatch(update).await;
                    });
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Polling failed, retrying");
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
    }

    tracing::info!(dispatched, in_flight = in_flight.len(), "Polling stopped");
    let abandoned = drain(&mut in_flight, drain_timeout).await;
    if abandoned > 0 {
        tracing::warn!(abandoned, "Shutdown drain timed out, aborting remaining updates");
    }
    dispatched
}

/// Wait for every task in `tasks` for at most `timeout`. Tasks still running
/// then are aborted and counted.
async fn drain(tasks: &mut JoinSet<()>, timeout: Duration) -> usize {
    let finished = tokio::time::timeout(timeout, async {
        while let Some(result) = tasks.join_next().await {
            log_join_failure(result);
        }
    })
    .await;

    if finished.is_ok() {
        return 0;
    }
    let abandoned = tasks.len();
    tasks.abort_all();
    abandoned
}

fn log_join_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!(error = %e, "Update handler panicked");
        }
    }
}

/// Completes on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
