// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unsolicited messages pushed by the server.

use crate::id::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message the server sent without a matching request.
///
/// Anything that is neither a reply nor a recognised change notice is kept
/// as `Other` so callers still see it in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    JobsChanged(Vec<JobId>),
    MachinesChanged(Vec<String>),
    #[serde(untagged)]
    Other(Value),
}

impl Notification {
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(notification) => notification,
            Err(_) => Notification::Other(value),
        }
    }

    /// Whether this notice may concern `job`.
    ///
    /// Unrecognised notices count as possibly relevant; a spurious wake-up
    /// only costs one extra state query.
    pub fn concerns_job(&self, job: JobId) -> bool {
        match self {
            Notification::JobsChanged(ids) => ids.contains(&job),
            Notification::MachinesChanged(_) => false,
            Notification::Other(_) => true,
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
