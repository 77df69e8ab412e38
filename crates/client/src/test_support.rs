// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted stand-in for a spalloc server.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use spalloc_wire::{encode, Request};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;

/// How long scripted steps wait before declaring the client silent.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// A TCP listener on an ephemeral localhost port that serves one client
/// connection at a time.
pub struct MockServer {
    listener: TcpListener,
    conn: Option<(BufReader<OwnedReadHalf>, OwnedWriteHalf)>,
}

impl MockServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        Self { listener, conn: None }
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().expect("local addr").port()
    }

    /// Accept the next client connection, replacing any current one.
    pub async fn accept(&mut self) {
        let (stream, _) = tokio::time::timeout(STEP_TIMEOUT, self.listener.accept())
            .await
            .expect("client did not connect")
            .expect("accept failed");
        let (reader, writer) = stream.into_split();
        self.conn = Some((BufReader::new(reader), writer));
    }

    /// Whether a client connects within `wait`.
    pub async fn try_accept(&mut self, wait: Duration) -> bool {
        match tokio::time::timeout(wait, self.listener.accept()).await {
            Ok(Ok((stream, _))) => {
                let (reader, writer) = stream.into_split();
                self.conn = Some((BufReader::new(reader), writer));
                true
            }
            _ => false,
        }
    }

    /// Drop the current connection.
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Next request from the client, or `None` if it sends nothing within
    /// `wait` or disconnects.
    pub async fn try_recv(&mut self, wait: Duration) -> Option<Request> {
        let (reader, _) = self.conn.as_mut()?;
        let mut line = String::new();
        match tokio::time::timeout(wait, reader.read_line(&mut line)).await {
            Ok(Ok(n)) if n > 0 => {
                Some(serde_json::from_str(&line).expect("client sent invalid request"))
            }
            _ => None,
        }
    }

    pub async fn recv(&mut self) -> Request {
        self.try_recv(STEP_TIMEOUT).await.expect("client sent no request")
    }

    /// Receive a request and check its command name.
    pub async fn expect(&mut self, command: &str) -> Request {
        let request = self.recv().await;
        assert_eq!(request.command, command, "unexpected request: {request:?}");
        request
    }

    /// Send one JSON line.
    pub async fn send(&mut self, value: Value) {
        self.send_raw(&encode(&value).unwrap()).await;
    }

    /// Send bytes exactly as given.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        let (_, writer) = self.conn.as_mut().expect("no client connected");
        writer.write_all(bytes).await.expect("send to client");
    }

    pub async fn reply(&mut self, value: Value) {
        self.send(json!({ "return": value })).await;
    }

    pub async fn fail(&mut self, message: &str) {
        self.send(json!({ "exception": message })).await;
    }

    /// Expect `command` and answer it with `value`.
    pub async fn respond(&mut self, command: &str, value: Value) -> Request {
        let request = self.expect(command).await;
        self.reply(value).await;
        request
    }

    /// Accept a connection and pass the version check.
    pub async fn handshake(&mut self, version: &str) {
        self.accept().await;
        self.respond("version", json!(version)).await;
    }
}
