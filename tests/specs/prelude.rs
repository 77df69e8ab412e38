// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a fluent wrapper around the `spalloc` binary and a
//! scripted server to point it at.

pub use serde_json::json;
pub use spalloc_client::test_support::MockServer;

use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;

/// Version string the scripted server reports.
pub const SERVER_VERSION: &str = "1.0.0";

/// A `spalloc` invocation that ignores every config file on the machine.
pub struct Spalloc {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: Option<String>,
    _config: Option<TempDir>,
}

pub fn cli() -> Spalloc {
    Spalloc { args: Vec::new(), envs: Vec::new(), stdin: None, _config: None }
}

impl Spalloc {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    /// Point the command at a local server.
    pub fn server(self, port: u16) -> Self {
        let port = port.to_string();
        self.args(&["--hostname", "127.0.0.1", "--port", &port, "--timeout", "5"])
    }

    /// Use `text` as the only config file.
    pub fn config(mut self, text: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spalloc.toml");
        std::fs::write(&path, text).unwrap();
        self.envs.push(("SPALLOC_CONFIG".into(), path.display().to_string()));
        self._config = Some(dir);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("spalloc").unwrap();
        let missing: PathBuf = std::env::temp_dir().join("spalloc-specs-no-such-config");
        cmd.env("SPALLOC_CONFIG", missing).env("NO_COLOR", "1").env_remove("SPALLOC_LOG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(input) = &self.stdin {
            cmd.write_stdin(input.clone());
        }
        cmd.args(&self.args).timeout(std::time::Duration::from_secs(30));
        cmd
    }

    /// Run to completion without blocking the runtime driving the server.
    pub async fn run(self) -> Run {
        let mut cmd = self.command();
        let output = tokio::task::spawn_blocking(move || cmd.output().unwrap()).await.unwrap();
        Run { output }
    }

    /// Run without a server, for argument and config errors.
    pub fn run_offline(self) -> Run {
        Run { output: self.command().output().unwrap() }
    }

    pub fn passes(self) -> Run {
        self.run_offline().passes()
    }
}

/// Finished invocation with chainable assertions.
pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn exits(self, code: i32) -> Self {
        assert_eq!(
            self.output.status.code(),
            Some(code),
            "stdout:\n{}\nstderr:\n{}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    pub fn passes(self) -> Self {
        self.exits(0)
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout lacks {needle:?}:\n{stdout}");
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(needle), "stdout has {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr lacks {needle:?}:\n{stderr}");
        self
    }
}
