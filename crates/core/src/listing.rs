// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rows returned by the server's listing and lookup commands.

use crate::id::JobId;
use crate::state::JobState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// One entry of `list_jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default, with = "crate::secs")]
    pub keepalive: Option<Duration>,
    /// Kept raw: servers have been seen reporting codes outside the known set.
    pub state: Value,
    #[serde(default)]
    pub power: Option<bool>,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    #[serde(default)]
    pub allocated_machine_name: Option<String>,
    #[serde(default)]
    pub boards: Option<Vec<Value>>,
    #[serde(default)]
    pub keepalivehost: Option<String>,
}

impl JobSummary {
    pub fn job_state(&self) -> Option<JobState> {
        serde_json::from_value(self.state.clone()).ok()
    }

    /// State name, or the raw value when it is not a known state.
    pub fn state_label(&self) -> String {
        match self.job_state() {
            Some(state) => state.to_string(),
            None => match &self.state {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }

    pub fn num_boards(&self) -> usize {
        self.boards.as_ref().map_or(0, Vec::len)
    }
}

/// One entry of `list_machines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSummary {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// In triads.
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub dead_boards: Vec<(u32, u32, u32)>,
    #[serde(default)]
    pub dead_links: Vec<(u32, u32, u32, u32)>,
}

impl MachineSummary {
    /// Working boards: three per triad, less the dead ones.
    pub fn num_boards(&self) -> u64 {
        let total = u64::from(self.width) * u64::from(self.height) * 3;
        total.saturating_sub(self.dead_boards.len() as u64)
    }
}

/// Reply to `where_is`: every way of naming one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLocation {
    pub machine: String,
    /// `[x, y, z]`
    pub logical: (u32, u32, u32),
    /// `[cabinet, frame, board]`
    pub physical: (u32, u32, u32),
    pub chip: (u32, u32),
    pub board_chip: (u32, u32),
    #[serde(default)]
    pub job_chip: Option<(u32, u32)>,
    #[serde(default)]
    pub job_id: Option<JobId>,
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
