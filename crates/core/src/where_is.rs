// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queries accepted by the server's `where_is` command.

use crate::id::JobId;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// One of the four ways of asking where a board or chip is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereIs {
    /// By logical board coordinate.
    Board { machine: String, x: u32, y: u32, z: u32 },
    /// By physical cabinet, frame and board number.
    Physical { machine: String, cabinet: u32, frame: u32, board: u32 },
    /// By chip coordinate within a machine.
    Chip { machine: String, chip_x: u32, chip_y: u32 },
    /// By chip coordinate relative to a job's allocation.
    JobChip { job_id: JobId, chip_x: u32, chip_y: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhereIsError {
    #[error("invalid where_is arguments: {{{0}}}")]
    KeywordSet(String),
    #[error("where_is argument {key} must be {expected}")]
    BadValue { key: &'static str, expected: &'static str },
}

const KEYWORD_SETS: [&[&str]; 4] = [
    &["machine", "x", "y", "z"],
    &["machine", "cabinet", "frame", "board"],
    &["machine", "chip_x", "chip_y"],
    &["job_id", "chip_x", "chip_y"],
];

impl WhereIs {
    pub fn to_kwargs(&self) -> Map<String, Value> {
        let value = match self {
            WhereIs::Board { machine, x, y, z } => {
                json!({"machine": machine, "x": x, "y": y, "z": z})
            }
            WhereIs::Physical { machine, cabinet, frame, board } => {
                json!({"machine": machine, "cabinet": cabinet, "frame": frame, "board": board})
            }
            WhereIs::Chip { machine, chip_x, chip_y } => {
                json!({"machine": machine, "chip_x": chip_x, "chip_y": chip_y})
            }
            WhereIs::JobChip { job_id, chip_x, chip_y } => {
                json!({"job_id": job_id, "chip_x": chip_x, "chip_y": chip_y})
            }
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

impl TryFrom<Map<String, Value>> for WhereIs {
    type Error = WhereIsError;

    fn try_from(kwargs: Map<String, Value>) -> Result<Self, Self::Error> {
        let keys: BTreeSet<&str> = kwargs.keys().map(String::as_str).collect();
        let matched = KEYWORD_SETS
            .iter()
            .position(|set| set.len() == keys.len() && set.iter().all(|k| keys.contains(k)));

        let u = |key: &'static str| -> Result<u32, WhereIsError> {
            kwargs
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(WhereIsError::BadValue { key, expected: "a non-negative integer" })
        };
        let machine = || -> Result<String, WhereIsError> {
            kwargs
                .get("machine")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(WhereIsError::BadValue { key: "machine", expected: "a string" })
        };

        match matched {
            Some(0) => Ok(WhereIs::Board { machine: machine()?, x: u("x")?, y: u("y")?, z: u("z")? }),
            Some(1) => Ok(WhereIs::Physical {
                machine: machine()?,
                cabinet: u("cabinet")?,
                frame: u("frame")?,
                board: u("board")?,
            }),
            Some(2) => {
                Ok(WhereIs::Chip { machine: machine()?, chip_x: u("chip_x")?, chip_y: u("chip_y")? })
            }
            Some(3) => {
                let job_id = kwargs
                    .get("job_id")
                    .and_then(Value::as_u64)
                    .map(JobId)
                    .ok_or(WhereIsError::BadValue { key: "job_id", expected: "a job id" })?;
                Ok(WhereIs::JobChip { job_id, chip_x: u("chip_x")?, chip_y: u("chip_y")? })
            }
            _ => Err(WhereIsError::KeywordSet(keys.into_iter().collect::<Vec<_>>().join(", "))),
        }
    }
}

#[cfg(test)]
#[path = "where_is_tests.rs"]
mod tests;
