// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit job options layered over a [`Config`].

use crate::commands::JobRequest;
use crate::config::Config;
use crate::error::ClientError;
use spalloc_core::{Geometry, JobId};
use std::time::Duration;

/// Caller-supplied overrides. Anything left unset comes from the config.
///
/// Nullable settings use `Option<Option<T>>`: `Some(None)` explicitly clears
/// a value the config would otherwise supply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobOptions {
    pub geometry: Geometry,
    pub resume_job_id: Option<JobId>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub owner: Option<String>,
    pub keepalive: Option<Option<Duration>>,
    pub reconnect_delay: Option<Duration>,
    pub timeout: Option<Option<Duration>>,
    pub machine: Option<Option<String>>,
    pub tags: Option<Option<Vec<String>>>,
    pub min_ratio: Option<f64>,
    pub max_dead_boards: Option<Option<u32>>,
    pub max_dead_links: Option<Option<u32>>,
    pub require_torus: Option<bool>,
}

impl JobOptions {
    /// Options for a new job of the given shape.
    pub fn create(geometry: Geometry) -> Self {
        Self { geometry, ..Self::default() }
    }

    /// Options for attaching to an existing job.
    pub fn resume(job_id: JobId) -> Self {
        Self { resume_job_id: Some(job_id), ..Self::default() }
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn keepalive(mut self, keepalive: Option<Duration>) -> Self {
        self.keepalive = Some(keepalive);
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(Some(machine.into()));
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(Some(tags));
        self
    }

    /// Merge with `config` and validate.
    pub fn resolve(self, config: &Config) -> Result<JobSettings, ClientError> {
        let hostname = self
            .hostname
            .or_else(|| config.hostname.clone())
            .ok_or_else(|| ClientError::invalid("a hostname must be specified"))?;

        let target = match self.resume_job_id {
            Some(id) => JobTarget::Resume(id),
            None => {
                let request = JobRequest {
                    geometry: self.geometry,
                    owner: self.owner.or_else(|| config.owner.clone()),
                    keepalive: self.keepalive.unwrap_or(config.keepalive),
                    machine: self.machine.unwrap_or_else(|| config.machine.clone()),
                    tags: self.tags.unwrap_or_else(|| config.tags.clone()),
                    min_ratio: self.min_ratio.unwrap_or(config.min_ratio),
                    max_dead_boards: self.max_dead_boards.unwrap_or(config.max_dead_boards),
                    max_dead_links: self.max_dead_links.unwrap_or(config.max_dead_links),
                    require_torus: self.require_torus.unwrap_or(config.require_torus),
                };
                request.validate()?;
                JobTarget::Create(request)
            }
        };

        Ok(JobSettings {
            hostname,
            port: self.port.unwrap_or(config.port),
            reconnect_delay: self.reconnect_delay.unwrap_or(config.reconnect_delay),
            timeout: self.timeout.unwrap_or(config.timeout),
            target,
        })
    }
}

/// Whether a job handle creates a new job or attaches to an old one.
#[derive(Debug, Clone, PartialEq)]
pub enum JobTarget {
    Create(JobRequest),
    Resume(JobId),
}

/// Fully resolved settings for constructing a [`Job`](crate::Job).
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub hostname: String,
    pub port: u16,
    pub reconnect_delay: Duration,
    /// Bound on each individual server exchange.
    pub timeout: Option<Duration>,
    pub target: JobTarget,
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
