// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed wrappers for each server command.

use crate::error::ClientError;
use crate::transport::ProtocolClient;
use serde_json::{Map, Value};
use spalloc_core::{
    BoardLocation, Geometry, JobId, JobMachineInfo, JobStateSnapshot, JobSummary,
    MachineSummary, WhereIs,
};
use spalloc_wire::Request;
use std::time::Duration;

/// Arguments of `create_job`.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub geometry: Geometry,
    pub owner: Option<String>,
    /// `None` asks the server never to expire the job.
    pub keepalive: Option<Duration>,
    pub machine: Option<String>,
    pub tags: Option<Vec<String>>,
    pub min_ratio: f64,
    pub max_dead_boards: Option<u32>,
    pub max_dead_links: Option<u32>,
    pub require_torus: bool,
}

impl Default for JobRequest {
    fn default() -> Self {
        Self {
            geometry: Geometry::Any,
            owner: None,
            keepalive: Some(Duration::from_secs(60)),
            machine: None,
            tags: None,
            min_ratio: 0.333,
            max_dead_boards: Some(0),
            max_dead_links: None,
            require_torus: false,
        }
    }
}

impl JobRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.owner.as_deref().filter(|o| !o.is_empty()).is_none() {
            return Err(ClientError::invalid("an owner must be specified for all jobs"));
        }
        if self.machine.is_some() && self.tags.is_some() {
            return Err(ClientError::invalid("only one of tags and machine may be specified"));
        }
        Ok(())
    }

    fn to_request(&self) -> Request {
        Request::new("create_job")
            .args(self.geometry.args())
            .kwarg("owner", self.owner.clone())
            .kwarg("keepalive", self.keepalive.map(|k| k.as_secs_f64()))
            .kwarg("machine", self.machine.clone())
            .kwarg("tags", self.tags.clone())
            .kwarg("min_ratio", self.min_ratio)
            .kwarg("max_dead_boards", self.max_dead_boards)
            .kwarg("max_dead_links", self.max_dead_links)
            .kwarg("require_torus", self.require_torus)
    }
}

impl ProtocolClient {
    /// Version string advertised by the server.
    pub async fn version(&mut self, timeout: Option<Duration>) -> Result<String, ClientError> {
        self.request_as(Request::new("version"), timeout).await
    }

    /// Validated locally first; nothing is sent without an owner.
    pub async fn create_job(
        &mut self,
        job: &JobRequest,
        timeout: Option<Duration>,
    ) -> Result<JobId, ClientError> {
        job.validate()?;
        self.request_as(job.to_request(), timeout).await
    }

    pub async fn job_keepalive(
        &mut self,
        job_id: JobId,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.job_command("job_keepalive", job_id, timeout).await
    }

    pub async fn get_job_state(
        &mut self,
        job_id: JobId,
        timeout: Option<Duration>,
    ) -> Result<JobStateSnapshot, ClientError> {
        self.request_as(Request::new("get_job_state").arg(job_id.get()), timeout).await
    }

    pub async fn get_job_machine_info(
        &mut self,
        job_id: JobId,
        timeout: Option<Duration>,
    ) -> Result<JobMachineInfo, ClientError> {
        self.request_as(Request::new("get_job_machine_info").arg(job_id.get()), timeout).await
    }

    pub async fn power_on_job_boards(
        &mut self,
        job_id: JobId,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.job_command("power_on_job_boards", job_id, timeout).await
    }

    pub async fn power_off_job_boards(
        &mut self,
        job_id: JobId,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.job_command("power_off_job_boards", job_id, timeout).await
    }

    pub async fn destroy_job(
        &mut self,
        job_id: JobId,
        reason: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        let request = Request::new("destroy_job").arg(job_id.get()).arg(reason);
        self.request(request, timeout).await.map(drop)
    }

    /// Subscribe to changes of one job, or of all jobs with `None`.
    pub async fn notify_job(
        &mut self,
        job_id: Option<JobId>,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        let request = Request::new("notify_job").arg(job_id.map(JobId::get));
        self.request(request, timeout).await.map(drop)
    }

    pub async fn no_notify_job(
        &mut self,
        job_id: Option<JobId>,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        let request = Request::new("no_notify_job").arg(job_id.map(JobId::get));
        self.request(request, timeout).await.map(drop)
    }

    /// Subscribe to changes of one machine, or of all machines with `None`.
    pub async fn notify_machine(
        &mut self,
        machine: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.request(Request::new("notify_machine").arg(machine), timeout).await.map(drop)
    }

    pub async fn no_notify_machine(
        &mut self,
        machine: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.request(Request::new("no_notify_machine").arg(machine), timeout).await.map(drop)
    }

    pub async fn list_jobs(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Vec<JobSummary>, ClientError> {
        self.request_as(Request::new("list_jobs"), timeout).await
    }

    pub async fn list_machines(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Vec<MachineSummary>, ClientError> {
        self.request_as(Request::new("list_machines"), timeout).await
    }

    /// Physical `(cabinet, frame, board)` of a logical board.
    pub async fn get_board_position(
        &mut self,
        machine: &str,
        x: u32,
        y: u32,
        z: u32,
        timeout: Option<Duration>,
    ) -> Result<Option<(u32, u32, u32)>, ClientError> {
        let request = Request::new("get_board_position").arg(machine).arg(x).arg(y).arg(z);
        self.request_as(request, timeout).await
    }

    /// Logical `(x, y, z)` of a physical board.
    pub async fn get_board_at_position(
        &mut self,
        machine: &str,
        cabinet: u32,
        frame: u32,
        board: u32,
        timeout: Option<Duration>,
    ) -> Result<Option<(u32, u32, u32)>, ClientError> {
        let request =
            Request::new("get_board_at_position").arg(machine).arg(cabinet).arg(frame).arg(board);
        self.request_as(request, timeout).await
    }

    /// `None` when nothing is at the queried location.
    pub async fn where_is(
        &mut self,
        query: &WhereIs,
        timeout: Option<Duration>,
    ) -> Result<Option<BoardLocation>, ClientError> {
        self.request_as(Request::new("where_is").kwargs(query.to_kwargs()), timeout).await
    }

    /// Like [`where_is`](Self::where_is) for an untyped keyword map.
    ///
    /// The map must match one of the accepted keyword sets exactly; anything
    /// else is rejected before a byte is written.
    pub async fn where_is_kwargs(
        &mut self,
        kwargs: Map<String, Value>,
        timeout: Option<Duration>,
    ) -> Result<Option<BoardLocation>, ClientError> {
        let query = WhereIs::try_from(kwargs).map_err(|e| ClientError::invalid(e.to_string()))?;
        self.where_is(&query, timeout).await
    }

    async fn job_command(
        &mut self,
        command: &str,
        job_id: JobId,
        timeout: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.request(Request::new(command).arg(job_id.get()), timeout).await.map(drop)
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
