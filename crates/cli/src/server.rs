// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server connection arguments shared by every command.

use crate::exit_error::ExitError;
use clap::Args;
use spalloc_client::{check_version, ClientError, Config, ProtocolClient};
use spalloc_core::secs::duration_from_secs;
use spalloc_core::VersionRange;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Server")]
pub struct ServerArgs {
    /// Hostname or IP of the spalloc server
    #[arg(long, short = 'H')]
    pub hostname: Option<String>,

    /// Port number of the spalloc server
    #[arg(long, short = 'P')]
    pub port: Option<u16>,

    /// Seconds to wait for a response from the server (negative waits forever)
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub timeout: Option<f64>,
}

/// Where and how patiently to talk to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    pub hostname: String,
    pub port: u16,
    pub timeout: Option<Duration>,
}

impl ServerArgs {
    /// Explicit timeout override: `Some(None)` means wait forever.
    pub fn timeout_override(&self) -> Option<Option<Duration>> {
        self.timeout.map(duration_from_secs)
    }

    /// Fill anything not given on the command line from `config`.
    pub fn resolve(&self, config: &Config) -> Result<Server, ExitError> {
        let hostname = self
            .hostname
            .clone()
            .or_else(|| config.hostname.clone())
            .ok_or_else(|| ExitError::new(2, "--hostname of spalloc server must be specified"))?;
        Ok(Server {
            hostname,
            port: self.port.unwrap_or(config.port),
            timeout: self.timeout_override().unwrap_or(config.timeout),
        })
    }
}

impl Server {
    /// Connect and check the server speaks a version the tools understand.
    pub async fn connect(&self) -> Result<ProtocolClient, ExitError> {
        let mut client = ProtocolClient::new(self.hostname.clone(), self.port);
        client.connect(self.timeout).await.map_err(ExitError::communication)?;
        match check_version(&mut client, VersionRange::TOOLS, self.timeout).await {
            Ok(version) => {
                debug!("connected to spalloc server {} at {}:{}", version, self.hostname, self.port);
                Ok(client)
            }
            Err(ClientError::IncompatibleVersion { version }) => {
                Err(ExitError::new(2, format!("Incompatible server version ({version}).")))
            }
            Err(e) => {
                client.close();
                Err(ExitError::communication(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
