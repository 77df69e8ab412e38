// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background task that keeps a job from being reaped.

use super::Shared;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Handle on a running keepalive task.
#[derive(Debug)]
pub(super) struct KeepaliveTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl KeepaliveTask {
    /// Send a keepalive every half `period`, so two chances fit in each
    /// server-side expiry window.
    pub(super) fn spawn(shared: Arc<Shared>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(shared, (period / 2).max(MIN_INTERVAL), cancel.clone()));
        Self { cancel, handle }
    }

    pub(super) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for the task to finish.
    pub(super) async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!("keepalive task ended abnormally: {}", e);
        }
    }
}

async fn run(shared: Arc<Shared>, interval: Duration, cancel: CancellationToken) {
    debug!("keepalive for job {} every {:.1}s", shared.id, interval.as_secs_f64());
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = keep_alive(&shared, &cancel) => {}
        }
    }
    debug!("keepalive for job {} stopped", shared.id);
}

/// Send one keepalive. If the connection has failed, reconnect once and send
/// once more.
///
/// Errors are logged only; the next cycle tries again.
async fn keep_alive(shared: &Shared, cancel: &CancellationToken) {
    let mut client = shared.client.lock().await;
    let err = match client.job_keepalive(shared.id, shared.timeout).await {
        Ok(()) => return,
        Err(e) => e,
    };
    if !err.is_transport() {
        warn!("keepalive for job {} rejected: {}", shared.id, err);
        return;
    }

    warn!("keepalive for job {} failed: {}", shared.id, err);
    client.close();
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(shared.reconnect_delay) => {}
    }
    if shared.reconnect(&mut client, shared.timeout).await.is_err() {
        return;
    }
    if let Err(e) = client.job_keepalive(shared.id, shared.timeout).await {
        warn!("keepalive for job {} failed after reconnecting: {}", shared.id, e);
        if e.is_transport() {
            client.close();
        }
    }
}

#[cfg(test)]
#[path = "keepalive_tests.rs"]
mod tests;
