// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connect-and-retry policy plus the server version gate.

use crate::deadline::Deadline;
use crate::error::ClientError;
use crate::transport::ProtocolClient;
use spalloc_core::VersionRange;
use std::time::Duration;
use tracing::{debug, warn};

/// How hard to try before giving up on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    delay: Duration,
    timeout: Option<Duration>,
    retry: bool,
}

impl ReconnectPolicy {
    /// Retry transport failures every `delay` until `timeout` has passed.
    /// With no timeout, retry forever.
    pub fn until(delay: Duration, timeout: Option<Duration>) -> Self {
        Self { delay, timeout, retry: true }
    }

    /// Try once and surface the first failure unchanged.
    pub fn once() -> Self {
        Self { delay: Duration::ZERO, timeout: None, retry: false }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn start(&self) -> Retry {
        Retry { policy: *self, deadline: Deadline::after(self.timeout), attempts: 0 }
    }
}

/// Progress of one run of a [`ReconnectPolicy`].
#[derive(Debug)]
pub struct Retry {
    policy: ReconnectPolicy,
    deadline: Deadline,
    attempts: u32,
}

impl Retry {
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Decide what to do after a failed attempt.
    ///
    /// `Ok(delay)` means sleep that long and try again. `Err` is the error to
    /// surface: non-transport errors and single-shot failures unchanged,
    /// `Timeout` once the budget is spent.
    pub fn after_failure(&mut self, err: ClientError) -> Result<Duration, ClientError> {
        self.attempts += 1;
        if !self.policy.retry || !err.is_transport() {
            return Err(err);
        }
        if self.deadline.expired() {
            debug!("giving up after {} attempts: {}", self.attempts, err);
            return Err(ClientError::Timeout);
        }
        Ok(self.deadline.clamp(self.policy.delay))
    }
}

/// Ask the server for its version and refuse anything outside `range`.
///
/// The connection is closed on refusal. A version string that does not parse
/// is refused too.
pub async fn check_version(
    client: &mut ProtocolClient,
    range: VersionRange,
    timeout: Option<Duration>,
) -> Result<String, ClientError> {
    let version = client.version(timeout).await?;
    match range.accepts(&version) {
        Ok(true) => Ok(version),
        Ok(false) | Err(_) => {
            client.close();
            Err(ClientError::IncompatibleVersion { version })
        }
    }
}

/// Connect and pass the version gate, retrying as the policy allows.
///
/// `timeout` bounds each individual connect and `version` exchange.
pub async fn connect_with_policy(
    client: &mut ProtocolClient,
    policy: ReconnectPolicy,
    range: VersionRange,
    timeout: Option<Duration>,
) -> Result<(), ClientError> {
    let mut retry = policy.start();
    loop {
        let attempt_timeout = retry.deadline().clamp_opt(timeout);
        match connect_once(client, range, attempt_timeout).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                client.close();
                let delay = retry.after_failure(e)?;
                warn!(
                    "cannot reach {}:{} (attempt {}), retrying in {:.1}s",
                    client.hostname(),
                    client.port(),
                    retry.attempts(),
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn connect_once(
    client: &mut ProtocolClient,
    range: VersionRange,
    timeout: Option<Duration>,
) -> Result<(), ClientError> {
    client.connect(timeout).await?;
    let version = check_version(client, range, timeout).await?;
    debug!("server version {} accepted", version);
    Ok(())
}

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;
