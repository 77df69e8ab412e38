// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request envelope and classification of incoming lines.

use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A command sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl Request {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), args: Vec::new(), kwargs: Map::new() }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.args.extend(values);
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn kwargs(mut self, values: Map<String, Value>) -> Self {
        self.kwargs.extend(values);
        self
    }
}

/// One decoded line from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Successful reply to the outstanding request.
    Return(Value),
    /// The server refused the outstanding request.
    Exception(String),
    /// Anything else: pushed by the server, not a reply.
    Notification(Value),
}

impl Message {
    pub fn classify(value: Value) -> Result<Self, ProtocolError> {
        let Value::Object(mut map) = value else {
            return Err(ProtocolError::NotAnObject(value.to_string()));
        };
        if let Some(ret) = map.remove("return") {
            return Ok(Message::Return(ret));
        }
        if let Some(exc) = map.remove("exception") {
            let message = match exc {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Ok(Message::Exception(message));
        }
        Ok(Message::Notification(Value::Object(map)))
    }
}
