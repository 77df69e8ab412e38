// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server version parsing and the half-open compatibility range.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A three-component version number.
///
/// Parsing keeps only the first three dot-separated components, so
/// `"1.2.3.dev4"` compares as `1.2.3`. Missing components count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed version string: {0:?}")]
pub struct VersionError(pub String);

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionError(s.to_string()));
        }
        let mut parts = [0u64; 3];
        for (slot, component) in parts.iter_mut().zip(trimmed.split('.')) {
            *slot = component.parse().map_err(|_| VersionError(s.to_string()))?;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Half-open range `[start, stop)` of acceptable server versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub start: Version,
    pub stop: Version,
}

impl VersionRange {
    /// Versions accepted when managing jobs.
    pub const JOB: VersionRange =
        VersionRange { start: Version::new(0, 0, 2), stop: Version::new(2, 0, 0) };

    /// Versions accepted by the command-line tools.
    pub const TOOLS: VersionRange =
        VersionRange { start: Version::new(0, 1, 0), stop: Version::new(2, 0, 0) };

    pub const fn new(start: Version, stop: Version) -> Self {
        Self { start, stop }
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.start <= *version && *version < self.stop
    }

    /// Parse `advertised` and check it against the range.
    pub fn accepts(&self, advertised: &str) -> Result<bool, VersionError> {
        Ok(self.contains(&advertised.parse()?))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
