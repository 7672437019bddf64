// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `EnerMon` library.
//!
//! Most data-quality problems in this library are deliberately *not* errors:
//! malformed telemetry payloads and unroutable topics are dropped in favor of
//! the last known good state. The types here cover the failures that callers
//! can actually act on: broker connection problems, payload shapes that a
//! caller asked to be parsed explicitly, and REST backend failures.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred on the broker connection.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a topic or payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while talking to the REST backend.
    #[cfg(feature = "http")]
    #[error("api error: {0}")]
    Api(#[from] ApiError),
}

/// Errors related to the MQTT broker connection.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client operation failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection attempt timed out.
    #[error("connection timed out after {0} ms")]
    Timeout(u64),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing topics and payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Topic does not match any shape this library understands.
    #[error("unsupported topic: {0}")]
    UnsupportedTopic(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp text did not match the backend's wire format.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Errors related to the REST backend.
#[cfg(feature = "http")]
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status and no usable error body.
    #[error("server returned status {0}")]
    Status(u16),

    /// Server reported a failure in its response envelope.
    #[error("server rejected request: {0}")]
    Rejected(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
