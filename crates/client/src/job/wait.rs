// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking waits on job state, driven by server notifications.
//!
//! While a waiter blocks on the socket it holds the connection lock, so it
//! also takes over sending keepalives for that window.

use super::Job;
use crate::deadline::Deadline;
use crate::error::ClientError;
use spalloc_core::JobState;
use std::time::Duration;
use tracing::{debug, info, warn};

const UNRECOGNISED_REASON: &str = "server no longer recognises job";

impl Job {
    /// Block until the job leaves `known`, returning the new state.
    ///
    /// Returns `known` unchanged once the timeout elapses. Lost connections
    /// are re-established and the wait carries on.
    pub async fn wait_for_state_change(
        &self,
        known: JobState,
        timeout: Option<Duration>,
    ) -> Result<JobState, ClientError> {
        let deadline = Deadline::after(timeout);
        while !deadline.expired() {
            match self.watch_for_change(known, deadline).await {
                Ok(Some(state)) => return Ok(state),
                Ok(None) => break,
                Err(e) if e.is_transport() => {
                    warn!("lost connection while waiting on job {}: {}", self.shared.id, e);
                    self.shared.client.lock().await.close();
                    tokio::time::sleep(deadline.clamp(self.shared.reconnect_delay)).await;

                    let mut client = self.shared.client.lock().await;
                    if !client.is_connected() {
                        // Failure is logged; the next pass retries.
                        let timeout = deadline.clamp_opt(self.shared.timeout);
                        let _ = self.shared.reconnect(&mut client, timeout).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(known)
    }

    /// One connected stretch of a wait. `Ok(None)` means the deadline passed.
    async fn watch_for_change(
        &self,
        known: JobState,
        deadline: Deadline,
    ) -> Result<Option<JobState>, ClientError> {
        let id = self.shared.id;
        let timeout = self.shared.timeout;
        self.shared.client.lock().await.notify_job(Some(id), timeout).await?;

        while !deadline.expired() {
            let state = self.get_state().await?.state;
            if state != known {
                return Ok(Some(state));
            }

            let mut client = self.shared.client.lock().await;
            loop {
                if deadline.expired() {
                    return Ok(None);
                }
                client.job_keepalive(id, timeout).await?;

                let wait = deadline.clamp_opt(self.shared.keepalive.map(|k| k / 2));
                match client.wait_for_notification(wait).await? {
                    Some(notification) if notification.concerns_job(id) => {
                        debug!("job {} woken by {:?}", id, notification);
                        break;
                    }
                    Some(notification) => debug!("ignoring {:?}", notification),
                    None => {}
                }
            }
        }
        Ok(None)
    }

    /// Block until the job is ready.
    ///
    /// Fails with `JobDestroyed` if the job reaches a state it can never
    /// leave, and with `StateChangeTimeout` if the timeout elapses first.
    pub async fn wait_until_ready(&self, timeout: Option<Duration>) -> Result<(), ClientError> {
        let deadline = Deadline::after(timeout);
        let mut seen: Option<JobState> = None;
        loop {
            let state = match seen {
                Some(state) => state,
                None if deadline.expired() => return Err(ClientError::StateChangeTimeout),
                None => self.get_state().await?.state,
            };

            match state {
                JobState::Ready => return Ok(()),
                JobState::Queued => info!("job {} queued by the server", self.shared.id),
                JobState::Power => info!("waiting for board power commands to complete"),
                JobState::Destroyed => {
                    let reason = self.last_state().and_then(|snapshot| snapshot.reason);
                    return Err(ClientError::JobDestroyed { reason });
                }
                JobState::Unknown => {
                    return Err(ClientError::JobDestroyed {
                        reason: Some(UNRECOGNISED_REASON.to_string()),
                    });
                }
            }

            if deadline.expired() {
                return Err(ClientError::StateChangeTimeout);
            }
            seen = Some(self.wait_for_state_change(state, deadline.remaining()).await?);
        }
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
