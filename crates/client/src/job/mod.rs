// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! High-level handle on one job.
//!
//! A [`Job`] owns a single server connection, shared under a mutex between
//! foreground calls and a background keepalive task. The job id never changes
//! for the life of the handle.

mod keepalive;
mod wait;

use crate::config::Config;
use crate::error::ClientError;
use crate::options::{JobOptions, JobSettings, JobTarget};
use crate::reconnect::{connect_with_policy, ReconnectPolicy};
use crate::transport::ProtocolClient;
use futures_util::future::BoxFuture;
use keepalive::KeepaliveTask;
use parking_lot::Mutex;
use spalloc_core::{ChipCoord, JobId, JobState, JobStateSnapshot, MachineInfo, VersionRange};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::MutexGuard;
use tracing::{info, warn};

/// State shared between the handle and its keepalive task.
#[derive(Debug)]
struct Shared {
    id: JobId,
    client: tokio::sync::Mutex<ProtocolClient>,
    /// Bound on each individual server exchange.
    timeout: Option<Duration>,
    reconnect_delay: Duration,
    /// Server-side expiry period; `None` means the job never expires.
    keepalive: Option<Duration>,
    last_state: Mutex<Option<JobStateSnapshot>>,
    machine_info: OnceLock<MachineInfo>,
}

impl Shared {
    /// One reconnect attempt with the version gate, each step bounded by
    /// `timeout`. Failures are logged and leave the client disconnected.
    async fn reconnect(
        &self,
        client: &mut ProtocolClient,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        match connect_with_policy(client, ReconnectPolicy::once(), VersionRange::JOB, timeout).await
        {
            Ok(()) => {
                info!("reconnected to {}:{}", client.hostname(), client.port());
                Ok(())
            }
            Err(e) => {
                warn!("reconnect attempt failed: {}", e);
                client.close();
                Err(e)
            }
        }
    }

    /// Lock the connection, reconnecting once first if an earlier failure
    /// closed it.
    async fn connection(&self) -> Result<MutexGuard<'_, ProtocolClient>, ClientError> {
        let mut client = self.client.lock().await;
        if !client.is_connected() {
            self.reconnect(&mut client, self.timeout).await?;
        }
        Ok(client)
    }
}

/// A job on a spalloc server.
#[derive(Debug)]
pub struct Job {
    shared: Arc<Shared>,
    keepalive: Option<KeepaliveTask>,
    closed: bool,
}

impl Job {
    /// Resolve `options` against `config`, then create or resume the job.
    pub async fn new(options: JobOptions, config: &Config) -> Result<Self, ClientError> {
        Self::create(options.resolve(config)?).await
    }

    /// Connect, check the server version, then create or resume the job.
    ///
    /// The initial connection is attempted once, so an unreachable server is
    /// reported straight away. Later losses are retried in the background.
    pub async fn create(settings: JobSettings) -> Result<Self, ClientError> {
        let JobSettings { hostname, port, reconnect_delay, timeout, target } = settings;
        let mut client = ProtocolClient::new(hostname, port);
        connect_with_policy(&mut client, ReconnectPolicy::once(), VersionRange::JOB, timeout)
            .await?;

        let (id, keepalive, last_state) = match target {
            JobTarget::Resume(id) => {
                let snapshot = match client.get_job_state(id, timeout).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        client.close();
                        return Err(e);
                    }
                };
                if snapshot.state.is_terminal() {
                    client.close();
                    let mut reason = format!("job {} does not exist: {}", id, snapshot.state);
                    if let Some(why) = &snapshot.reason {
                        reason.push_str(": ");
                        reason.push_str(why);
                    }
                    return Err(ClientError::JobDestroyed { reason: Some(reason) });
                }
                info!("resumed job {}", id);
                (id, snapshot.keepalive, Some(snapshot))
            }
            JobTarget::Create(request) => {
                let id = match client.create_job(&request, timeout).await {
                    Ok(id) => id,
                    Err(e) => {
                        client.close();
                        return Err(e);
                    }
                };
                info!("created job {}", id);
                (id, request.keepalive, None)
            }
        };

        let shared = Arc::new(Shared {
            id,
            client: tokio::sync::Mutex::new(client),
            timeout,
            reconnect_delay,
            keepalive,
            last_state: Mutex::new(last_state),
            machine_info: OnceLock::new(),
        });
        let keepalive = keepalive.map(|period| KeepaliveTask::spawn(Arc::clone(&shared), period));

        Ok(Self { shared, keepalive, closed: false })
    }

    pub fn id(&self) -> JobId {
        self.shared.id
    }

    /// Keepalive period agreed with the server.
    pub fn keepalive(&self) -> Option<Duration> {
        self.shared.keepalive
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Query the server for the job's current state.
    pub async fn get_state(&self) -> Result<JobStateSnapshot, ClientError> {
        let snapshot = {
            let mut client = self.shared.connection().await?;
            client.get_job_state(self.shared.id, self.shared.timeout).await?
        };
        *self.shared.last_state.lock() = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Most recent snapshot seen by any query, without asking the server.
    pub fn last_state(&self) -> Option<JobStateSnapshot> {
        self.shared.last_state.lock().clone()
    }

    pub async fn state(&self) -> Result<JobState, ClientError> {
        Ok(self.get_state().await?.state)
    }

    pub async fn power(&self) -> Result<Option<bool>, ClientError> {
        Ok(self.get_state().await?.power)
    }

    pub async fn reason(&self) -> Result<Option<String>, ClientError> {
        Ok(self.get_state().await?.reason)
    }

    /// Power the job's boards on or off. Does nothing before allocation.
    ///
    /// Use [`wait_until_ready`](Self::wait_until_ready) to wait for the
    /// change to complete.
    pub async fn set_power(&self, power: bool) -> Result<(), ClientError> {
        let mut client = self.shared.connection().await?;
        if power {
            client.power_on_job_boards(self.shared.id, self.shared.timeout).await
        } else {
            client.power_off_job_boards(self.shared.id, self.shared.timeout).await
        }
    }

    /// Power-cycle the job's boards.
    pub async fn reset(&self) -> Result<(), ClientError> {
        self.set_power(true).await
    }

    /// Machine geometry, once boards are allocated.
    ///
    /// Queries the server until the reply is complete, then never again.
    pub async fn machine_info(&self) -> Result<Option<MachineInfo>, ClientError> {
        if let Some(info) = self.shared.machine_info.get() {
            return Ok(Some(info.clone()));
        }
        let raw = {
            let mut client = self.shared.connection().await?;
            client.get_job_machine_info(self.shared.id, self.shared.timeout).await?
        };
        Ok(raw.complete().map(|info| self.shared.machine_info.get_or_init(|| info).clone()))
    }

    pub async fn width(&self) -> Result<Option<u32>, ClientError> {
        Ok(self.machine_info().await?.map(|m| m.width))
    }

    pub async fn height(&self) -> Result<Option<u32>, ClientError> {
        Ok(self.machine_info().await?.map(|m| m.height))
    }

    pub async fn connections(&self) -> Result<Option<BTreeMap<ChipCoord, String>>, ClientError> {
        Ok(self.machine_info().await?.map(|m| m.connections))
    }

    /// Hostname of the ethernet chip at (0, 0).
    pub async fn hostname(&self) -> Result<Option<String>, ClientError> {
        Ok(self.machine_info().await?.and_then(|m| m.hostname().map(str::to_string)))
    }

    pub async fn machine_name(&self) -> Result<Option<String>, ClientError> {
        Ok(self.machine_info().await?.map(|m| m.machine_name))
    }

    /// Stop the keepalive task and disconnect. The job stays on the server
    /// until its keepalive runs out. Calling again does nothing.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(task) = self.keepalive.take() {
            task.stop().await;
        }
        self.shared.client.lock().await.close();
    }

    /// Ask the server to release the job, then [`close`](Self::close).
    ///
    /// Transport failures are logged and ignored: the server reaps the job
    /// itself once keepalives stop. Calling again does nothing.
    pub async fn destroy(&mut self, reason: Option<&str>) -> Result<(), ClientError> {
        if self.closed {
            return Ok(());
        }
        let result = match self.shared.connection().await {
            Ok(mut client) => client.destroy_job(self.shared.id, reason, self.shared.timeout).await,
            Err(e) => Err(e),
        };
        self.close().await;
        match result {
            Err(e) if e.is_transport() => {
                warn!("could not destroy job {}: {}", self.shared.id, e);
                Ok(())
            }
            other => other,
        }
    }

    /// Wait until the boards are ready. On failure the job is destroyed
    /// before the error is returned.
    pub async fn enter(&mut self, timeout: Option<Duration>) -> Result<(), ClientError> {
        info!("waiting for boards to become ready");
        if let Err(e) = self.wait_until_ready(timeout).await {
            if let Err(destroy_err) = self.destroy(None).await {
                warn!("could not destroy job {}: {}", self.shared.id, destroy_err);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Run `body` once the boards are ready, destroying the job afterwards
    /// whatever happens.
    pub async fn scoped<T, F>(mut self, timeout: Option<Duration>, body: F) -> Result<T, ClientError>
    where
        F: for<'a> FnOnce(&'a Job) -> BoxFuture<'a, T>,
    {
        self.enter(timeout).await?;
        let output = body(&self).await;
        self.destroy(None).await?;
        Ok(output)
    }
}

impl Drop for Job {
    fn drop(&mut self) {
        if let Some(task) = &self.keepalive {
            task.cancel();
        }
    }
}

#[cfg(test)]
#[path = "../job_tests.rs"]
mod tests;
