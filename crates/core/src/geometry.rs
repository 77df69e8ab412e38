// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocation request shapes passed as positional arguments to `create_job`.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// What a new job asks the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Geometry {
    /// Any single board.
    #[default]
    Any,
    /// At least this many boards.
    Boards(u32),
    /// A rectangle of triads.
    Triads { width: u32, height: u32 },
    /// One specific board by logical coordinate.
    Board { x: u32, y: u32, z: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected at most 3 geometry values, got {0}")]
pub struct GeometryError(pub usize);

impl Geometry {
    /// Positional arguments for `create_job`.
    pub fn args(&self) -> Vec<Value> {
        match *self {
            Geometry::Any => Vec::new(),
            Geometry::Boards(n) => vec![n.into()],
            Geometry::Triads { width, height } => vec![width.into(), height.into()],
            Geometry::Board { x, y, z } => vec![x.into(), y.into(), z.into()],
        }
    }
}

impl TryFrom<&[u32]> for Geometry {
    type Error = GeometryError;

    fn try_from(values: &[u32]) -> Result<Self, Self::Error> {
        match *values {
            [] => Ok(Geometry::Any),
            [n] => Ok(Geometry::Boards(n)),
            [width, height] => Ok(Geometry::Triads { width, height }),
            [x, y, z] => Ok(Geometry::Board { x, y, z }),
            _ => Err(GeometryError(values.len())),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Any => f.write_str("1 board"),
            Geometry::Boards(1) => f.write_str("1 board"),
            Geometry::Boards(n) => write!(f, "{n} boards"),
            Geometry::Triads { width, height } => write!(f, "{width}x{height} triads"),
            Geometry::Board { x, y, z } => write!(f, "board ({x}, {y}, {z})"),
        }
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
