// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker-facing protocol layer.
//!
//! [`RoutedMessage`] turns raw topic strings into typed messages;
//! [`BrokerLink`] owns the single long-lived broker connection, keeps the
//! wildcard subscriptions alive across reconnects and folds inbound
//! messages into its device state store.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "mqtt")]
mod mqtt;
mod route;

#[cfg(feature = "mqtt")]
pub use mqtt::{BrokerConfig, BrokerLink, BrokerLinkBuilder, SUBSCRIBED_TOPICS};
pub use route::{RoutedMessage, Subtopic, TOPIC_PREFIX};

/// Lifecycle state of the broker connection.
///
/// Observed through [`BrokerLink::status_stream`]; connection problems are
/// never raised across the component boundary, they only show up here (and
/// in the logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connection, and none being attempted.
    Disconnected,
    /// Connection attempt in flight.
    Connecting,
    /// Connected and subscribed.
    Connected,
    /// The last connection or subscription attempt failed.
    Error,
}

impl ConnectionStatus {
    /// Returns the lowercase name of this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget outbound message seam.
///
/// [`BrokerLink`] implements this over its MQTT connection; tests can
/// substitute a recording implementation. Failures are the implementation's
/// to log; no outcome is reported and nothing is retried.
pub trait CommandSink {
    /// Publishes a payload to a topic, best-effort.
    fn send_command(&self, topic: &str, payload: &str);
}

impl<T: CommandSink + ?Sized> CommandSink for &T {
    fn send_command(&self, topic: &str, payload: &str) {
        (**self).send_command(topic, payload);
    }
}

impl<T: CommandSink + ?Sized> CommandSink for Arc<T> {
    fn send_command(&self, topic: &str, payload: &str) {
        (**self).send_command(topic, payload);
    }
}
