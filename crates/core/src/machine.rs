// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Machine geometry reported for an allocated job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A chip coordinate within a job's allocated region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChipCoord {
    pub x: u32,
    pub y: u32,
}

impl ChipCoord {
    pub const ORIGIN: ChipCoord = ChipCoord { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ChipCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Raw `get_job_machine_info` reply.
///
/// Every field is null until boards have been allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMachineInfo {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// `[[[x, y], hostname], ...]`
    #[serde(default)]
    pub connections: Option<Vec<((u32, u32), String)>>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub boards: Option<Vec<(u32, u32, u32)>>,
}

impl JobMachineInfo {
    /// The populated form, once every field is present.
    pub fn complete(&self) -> Option<MachineInfo> {
        let connections = self.connections.as_ref()?;
        Some(MachineInfo {
            width: self.width?,
            height: self.height?,
            connections: connections
                .iter()
                .map(|((x, y), host)| (ChipCoord::new(*x, *y), host.clone()))
                .collect(),
            machine_name: self.machine_name.clone()?,
        })
    }
}

/// Geometry of an allocated job. Never changes once known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfo {
    pub width: u32,
    pub height: u32,
    /// Ethernet-connected chips and their hostnames.
    pub connections: BTreeMap<ChipCoord, String>,
    pub machine_name: String,
}

impl MachineInfo {
    /// Hostname of the ethernet chip at (0, 0), the usual boot target.
    pub fn hostname(&self) -> Option<&str> {
        self.connections.get(&ChipCoord::ORIGIN).map(String::as_str)
    }

    /// `x,y,hostname` lines in chip order.
    pub fn ethernet_csv(&self) -> String {
        self.connections
            .iter()
            .map(|(chip, host)| format!("{},{},{}\n", chip.x, chip.y, host))
            .collect()
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
