// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spalloc-core: data model shared by the spalloc client and CLI.
//!
//! Everything here is plain data. The wire codec lives in `spalloc-wire` and
//! all I/O lives in `spalloc-client`.

pub mod geometry;
pub mod id;
pub mod listing;
pub mod machine;
pub mod notification;
pub mod secs;
pub mod state;
pub mod version;
pub mod where_is;

pub use geometry::{Geometry, GeometryError};
pub use id::JobId;
pub use listing::{BoardLocation, JobSummary, MachineSummary};
pub use machine::{ChipCoord, JobMachineInfo, MachineInfo};
pub use notification::Notification;
pub use state::{JobState, JobStateSnapshot};
pub use version::{Version, VersionError, VersionRange};
pub use where_is::{WhereIs, WhereIsError};
