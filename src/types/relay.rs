// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay state type.

use std::fmt;

/// State of a device's load relay.
///
/// Devices report their relay on `dev/<id>/relay/state` with a bare `"1"`
/// for on; anything else means off. Commands travel in the other direction
/// as the fixed strings `RELAY_ON` / `RELAY_OFF`.
///
/// The relay state tracked by this library is always device-authoritative:
/// it only changes when a `relay/state` report arrives, never optimistically
/// when a command is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RelayState {
    /// Relay is closed, the load is powered.
    On,
    /// Relay is open.
    #[default]
    Off,
}

impl RelayState {
    /// Parses a relay state payload: `"1"` is on, anything else is off.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        if payload.trim_ascii() == b"1" {
            Self::On
        } else {
            Self::Off
        }
    }

    /// Converts a toggle intent into a relay state.
    #[must_use]
    pub const fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// Returns the outbound command string for this state.
    #[must_use]
    pub const fn command_str(self) -> &'static str {
        match self {
            Self::On => "RELAY_ON",
            Self::Off => "RELAY_OFF",
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }

    /// Returns `true` if the relay is on.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
