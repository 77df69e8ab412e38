// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle states as reported by the allocation server.
//!
//! The client never decides a transition; it only observes the state the
//! server reports. `queued → power → ready` is the normal path, with
//! `destroyed` and `unknown` as terminal states.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// State of a job on the server.
///
/// Only identity matters: the numeric wire codes carry no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// The server has no record of this job id.
    Unknown,
    /// Accepted, waiting for boards.
    Queued,
    /// Boards assigned, power transition in progress.
    Power,
    /// Boards powered and usable.
    Ready,
    /// Released; the snapshot may carry a reason.
    Destroyed,
}

impl JobState {
    pub const ALL: [JobState; 5] =
        [JobState::Unknown, JobState::Queued, JobState::Power, JobState::Ready, JobState::Destroyed];

    /// Numeric code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            JobState::Unknown => 0,
            JobState::Queued => 1,
            JobState::Power => 2,
            JobState::Ready => 3,
            JobState::Destroyed => 4,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(JobState::Unknown),
            1 => Some(JobState::Queued),
            2 => Some(JobState::Power),
            3 => Some(JobState::Ready),
            4 => Some(JobState::Destroyed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JobState::Unknown => "unknown",
            JobState::Queued => "queued",
            JobState::Power => "power",
            JobState::Ready => "ready",
            JobState::Destroyed => "destroyed",
        }
    }

    /// `destroyed` and `unknown` can never become ready.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Destroyed | JobState::Unknown)
    }

    /// States in which boards are allocated to the job.
    pub fn has_boards(self) -> bool {
        matches!(self, JobState::Power | JobState::Ready)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobState::ALL
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| format!("unrecognised job state: {s}"))
    }
}

impl Serialize for JobState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for JobState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StateVisitor;

        impl Visitor<'_> for StateVisitor {
            type Value = JobState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a job state code (0-4) or name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<JobState, E> {
                JobState::from_code(v)
                    .ok_or_else(|| E::custom(format!("unrecognised job state code: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<JobState, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(JobState::from_code)
                    .ok_or_else(|| E::custom(format!("unrecognised job state code: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<JobState, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(StateVisitor)
    }
}

/// One answer to `get_job_state`.
///
/// Produced fresh by every query. `power` and `keepalive` are only meaningful
/// while the job is queued, powering or ready; `reason` only once destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStateSnapshot {
    pub state: JobState,
    #[serde(default)]
    pub power: Option<bool>,
    #[serde(default, with = "crate::secs")]
    pub keepalive: Option<Duration>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Epoch seconds at which the job was created.
    #[serde(default)]
    pub start_time: Option<f64>,
}

impl JobStateSnapshot {
    pub fn new(state: JobState) -> Self {
        Self { state, power: None, keepalive: None, reason: None, start_time: None }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
