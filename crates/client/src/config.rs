// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration files.
//!
//! Files are TOML with a `[spalloc]` table:
//!
//! ```toml
//! [spalloc]
//! hostname = "spalloc.example.com"
//! owner = "me@example.com"
//! keepalive = 60.0
//! tags = "none"
//! ```
//!
//! Files are read lowest priority first; a key in a later file replaces the
//! same key from earlier ones. Keys that may be unset accept the string
//! `"none"` to clear a value set by an earlier file.

use crate::transport::DEFAULT_PORT;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use spalloc_core::secs::duration_from_secs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Effective settings after all files have been read.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub hostname: Option<String>,
    pub owner: Option<String>,
    pub port: u16,
    pub keepalive: Option<Duration>,
    pub reconnect_delay: Duration,
    pub timeout: Option<Duration>,
    pub machine: Option<String>,
    pub tags: Option<Vec<String>>,
    pub min_ratio: f64,
    pub max_dead_boards: Option<u32>,
    pub max_dead_links: Option<u32>,
    pub require_torus: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: None,
            owner: None,
            port: DEFAULT_PORT,
            keepalive: Some(Duration::from_secs(60)),
            reconnect_delay: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(5)),
            machine: None,
            tags: None,
            min_ratio: 0.333,
            max_dead_boards: Some(0),
            max_dead_links: None,
            require_torus: false,
        }
    }
}

impl Config {
    /// Read every file on the search path over the defaults.
    ///
    /// Missing files are skipped.
    pub fn load(search: &SearchPath) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for path in search.paths() {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ConfigError::Read { path: path.clone(), source }),
            };
            debug!("reading config {}", path.display());
            config.merge_toml(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        }
        Ok(config)
    }

    /// Overlay the keys present in one TOML document.
    pub fn merge_toml(&mut self, text: &str) -> Result<(), toml::de::Error> {
        let document: ConfigDocument = toml::from_str(text)?;
        self.apply(document.spalloc);
        Ok(())
    }

    fn apply(&mut self, file: ConfigFile) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.hostname, file.hostname);
        set(&mut self.owner, file.owner);
        set(&mut self.port, file.port);
        set(&mut self.keepalive, file.keepalive.map(|k| k.and_then(duration_from_secs)));
        set(&mut self.reconnect_delay, file.reconnect_delay.and_then(duration_from_secs));
        set(&mut self.timeout, file.timeout.map(|t| t.and_then(duration_from_secs)));
        set(&mut self.machine, file.machine);
        set(&mut self.tags, file.tags);
        set(&mut self.min_ratio, file.min_ratio);
        set(&mut self.max_dead_boards, file.max_dead_boards);
        set(&mut self.max_dead_links, file.max_dead_links);
        set(&mut self.require_torus, file.require_torus);
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    spalloc: ConfigFile,
}

/// One file's worth of settings. Outer `None` = key absent.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default, deserialize_with = "nullable")]
    hostname: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    owner: Option<Option<String>>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default, deserialize_with = "nullable")]
    keepalive: Option<Option<f64>>,
    #[serde(default)]
    reconnect_delay: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    timeout: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    machine: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    tags: Option<Option<Vec<String>>>,
    #[serde(default)]
    min_ratio: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    max_dead_boards: Option<Option<u32>>,
    #[serde(default, deserialize_with = "nullable")]
    max_dead_links: Option<Option<u32>>,
    #[serde(default)]
    require_torus: Option<bool>,
}

/// A present key holding either `"none"` or a `T`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = toml::Value::deserialize(deserializer)?;
    if let toml::Value::String(s) = &value {
        if s.eq_ignore_ascii_case("none") {
            return Ok(Some(None));
        }
    }
    value.try_into().map(|v| Some(Some(v))).map_err(D::Error::custom)
}

/// Ordered list of config files, lowest priority first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPath(Vec<PathBuf>);

impl SearchPath {
    pub const FILENAME: &'static str = "spalloc";
    pub const CWD_FILENAME: &'static str = ".spalloc";

    /// System-wide, then per-user, then the working directory.
    pub fn standard() -> Self {
        let mut paths = vec![PathBuf::from("/etc/xdg").join(Self::FILENAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(Self::FILENAME));
        }
        paths.push(PathBuf::from(Self::CWD_FILENAME));
        Self(paths)
    }

    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self(paths.into_iter().collect())
    }

    pub fn single(path: impl AsRef<Path>) -> Self {
        Self(vec![path.as_ref().to_path_buf()])
    }

    /// No files at all; only defaults apply.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
