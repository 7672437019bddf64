// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topic routing for inbound device messages.
//!
//! All topic-string handling for the fleet lives here. An inbound topic of
//! the shape `dev/<device_id>/<subpath...>` is parsed once into a
//! [`RoutedMessage`], and everything downstream works with the typed
//! [`Subtopic`] instead of string segments.
//!
//! Topics that do not match a known shape are not errors worth surfacing:
//! the caller drops them silently (a shared broker can carry any amount of
//! foreign traffic).

use crate::error::ParseError;
use crate::types::DeviceId;

/// Fixed first segment of every fleet topic.
pub const TOPIC_PREFIX: &str = "dev";

/// The device-scoped message channels this library understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtopic {
    /// `status`: online/offline text payload.
    Status,
    /// `relay/state`: relay state report.
    RelayState,
    /// `pzem/metrics`: instantaneous sensor readings as JSON.
    PzemMetrics,
    /// `pzem/energy`: cumulative energy counter as float text.
    PzemEnergy,
}

impl Subtopic {
    /// Returns the subpath of this channel below `dev/<device_id>/`.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::RelayState => "relay/state",
            Self::PzemMetrics => "pzem/metrics",
            Self::PzemEnergy => "pzem/energy",
        }
    }
}

/// A successfully routed inbound message: which device, which channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    /// The device the message belongs to.
    pub device_id: DeviceId,
    /// The channel the message arrived on.
    pub subtopic: Subtopic,
}

impl RoutedMessage {
    /// Parses a topic of the shape `dev/<device_id>/<subpath...>`.
    ///
    /// The device identifier is taken verbatim (case-sensitive, no
    /// normalization). Fails on fewer than three segments, a wrong prefix,
    /// an empty device segment, or an unknown subpath.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnsupportedTopic`] for any topic this library
    /// does not consume.
    pub fn parse(topic: &str) -> Result<Self, ParseError> {
        let unsupported = || ParseError::UnsupportedTopic(topic.to_string());

        let parts: Vec<&str> = topic.split('/').collect();
        if parts.len() < 3 || parts[0] != TOPIC_PREFIX {
            return Err(unsupported());
        }

        let device_id = DeviceId::new(parts[1]).ok_or_else(unsupported)?;

        let subtopic = match &parts[2..] {
            ["status"] => Subtopic::Status,
            ["relay", "state"] => Subtopic::RelayState,
            ["pzem", "metrics"] => Subtopic::PzemMetrics,
            ["pzem", "energy"] => Subtopic::PzemEnergy,
            _ => return Err(unsupported()),
        };

        Ok(Self { device_id, subtopic })
    }

    /// Returns the full topic string for this message.
    #[must_use]
    pub fn topic(&self) -> String {
        format!(
            "{TOPIC_PREFIX}/{}/{}",
            self.device_id,
            self.subtopic.as_path()
        )
    }
}
