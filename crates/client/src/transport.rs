// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One TCP connection to a spalloc server.
//!
//! Requests are strictly sequential: the protocol has no request ids, so each
//! reply belongs to the oldest outstanding request. Notifications that arrive
//! while a reply is awaited are queued and handed out by
//! [`ProtocolClient::wait_for_notification`].

use crate::deadline::Deadline;
use crate::error::{ClientError, ErrorKind};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use spalloc_core::Notification;
use spalloc_wire::{encode, LineDecoder, Message, ProtocolError, Request};
use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Default TCP port of a spalloc server.
pub const DEFAULT_PORT: u16 = 22244;

const READ_CHUNK: usize = 1024;

/// Low-level client. Never reconnects on its own.
#[derive(Debug)]
pub struct ProtocolClient {
    hostname: String,
    port: u16,
    stream: Option<TcpStream>,
    decoder: LineDecoder,
    notifications: VecDeque<Notification>,
}

impl ProtocolClient {
    /// Does not connect until [`connect`](Self::connect) is called.
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            stream: None,
            decoder: LineDecoder::new(),
            notifications: VecDeque::new(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Open a fresh connection, dropping any previous one first.
    ///
    /// On failure the client is left disconnected.
    pub async fn connect(&mut self, timeout: Option<Duration>) -> Result<(), ClientError> {
        self.close();
        let deadline = Deadline::after(timeout);
        let stream =
            within(deadline, TcpStream::connect((self.hostname.as_str(), self.port))).await?;
        stream.set_nodelay(true)?;
        debug!("connected to {}:{}", self.hostname, self.port);
        self.stream = Some(stream);
        Ok(())
    }

    /// Drop the socket and any partial line. Safe to call repeatedly.
    ///
    /// Queued notifications are kept.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("disconnected from {}:{}", self.hostname, self.port);
        }
        if self.decoder.buffered() > 0 {
            debug!("discarding {} bytes of a partial line", self.decoder.buffered());
        }
        self.decoder.clear();
    }

    /// Send a request and wait for its reply.
    ///
    /// The timeout bounds the whole exchange, not each read. A transport or
    /// protocol failure once the request is on the wire closes the
    /// connection, since its reply may still arrive and would otherwise be
    /// taken as the answer to the next request.
    pub async fn call(
        &mut self,
        command: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        self.request(Request::new(command).args(args).kwargs(kwargs), timeout).await
    }

    pub async fn request(
        &mut self,
        request: Request,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        let deadline = Deadline::after(timeout);
        let bytes = encode(&request)?;
        debug!("-> {}", String::from_utf8_lossy(&bytes).trim_end());

        let result = self.exchange(&bytes, deadline).await;
        if let Err(e) = &result {
            if e.is_transport() || e.kind() == ErrorKind::Protocol {
                self.close();
            }
        }
        result
    }

    async fn exchange(&mut self, bytes: &[u8], deadline: Deadline) -> Result<Value, ClientError> {
        let stream = self.stream.as_mut().ok_or(ClientError::NotConnected)?;
        within(deadline, stream.write_all(bytes)).await?;

        loop {
            match self.read_message(deadline).await? {
                Message::Return(value) => return Ok(value),
                Message::Exception(message) => return Err(ClientError::Server(message)),
                Message::Notification(value) => {
                    self.notifications.push_back(Notification::from_value(value));
                }
            }
        }
    }

    /// Send a request and decode its reply.
    pub(crate) async fn request_as<T: DeserializeOwned>(
        &mut self,
        request: Request,
        timeout: Option<Duration>,
    ) -> Result<T, ClientError> {
        let value = self.request(request, timeout).await?;
        Ok(serde_json::from_value(value).map_err(ProtocolError::from)?)
    }

    /// Next notification, oldest first.
    ///
    /// Returns `Ok(None)` when none arrives within the timeout. A zero timeout
    /// only inspects the queue and never touches the socket.
    pub async fn wait_for_notification(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<Notification>, ClientError> {
        if let Some(notification) = self.notifications.pop_front() {
            return Ok(Some(notification));
        }
        if timeout.is_some_and(|t| t.is_zero()) {
            return Ok(None);
        }

        let deadline = Deadline::after(timeout);
        loop {
            match self.read_message(deadline).await {
                Ok(Message::Notification(value)) => {
                    return Ok(Some(Notification::from_value(value)));
                }
                Ok(reply) => debug!("ignoring unsolicited reply: {:?}", reply),
                Err(ClientError::Timeout) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }

    /// Number of notifications waiting to be collected.
    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    async fn read_message(&mut self, deadline: Deadline) -> Result<Message, ClientError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(value) = self.decoder.next_value()? {
                debug!("<- {}", value);
                return Ok(Message::classify(value)?);
            }
            let stream = self.stream.as_mut().ok_or(ClientError::NotConnected)?;
            let n = within(deadline, stream.read(&mut chunk)).await?;
            if n == 0 {
                return Err(ClientError::ConnectionClosed);
            }
            self.decoder.push(&chunk[..n]);
        }
    }
}

/// Run an I/O future, giving up when the deadline passes.
async fn within<T, F>(deadline: Deadline, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = io::Result<T>>,
{
    match deadline.remaining() {
        None => Ok(fut.await?),
        Some(left) => match tokio::time::timeout(left, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ClientError::Timeout),
        },
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
