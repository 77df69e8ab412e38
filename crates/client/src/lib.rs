// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spalloc-client: talk to a spalloc server and manage jobs on it.
//!
//! [`ProtocolClient`] is a single connection with one typed method per server
//! command. [`Job`] builds on it: it creates or resumes a job, keeps it alive
//! in the background, reconnects after failures and waits for state changes.

mod commands;
mod config;
mod deadline;
mod error;
mod job;
mod options;
mod reconnect;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use commands::JobRequest;
pub use config::{Config, ConfigError, SearchPath};
pub use deadline::Deadline;
pub use error::{ClientError, ErrorKind};
pub use job::Job;
pub use options::{JobOptions, JobSettings, JobTarget};
pub use reconnect::{check_version, connect_with_policy, ReconnectPolicy, Retry};
pub use transport::{ProtocolClient, DEFAULT_PORT};

pub use spalloc_core as core;
