// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device online status.

use std::fmt;

/// Whether a device is currently reachable.
///
/// Parsed from the text payload of a `dev/<id>/status` message. Parsing is
/// fail-safe: anything that is not recognizably "online" is treated as
/// [`OnlineStatus::Offline`], which is also the default for devices that
/// have not reported yet.
///
/// # Examples
///
/// ```
/// use enermon_lib::types::OnlineStatus;
///
/// assert_eq!(OnlineStatus::from_payload(b"Online"), OnlineStatus::Online);
/// assert_eq!(OnlineStatus::from_payload(b"OFFLINE"), OnlineStatus::Offline);
/// assert_eq!(OnlineStatus::from_payload(b"garbage"), OnlineStatus::Offline);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OnlineStatus {
    /// Device is connected and reporting.
    Online,
    /// Device is unreachable, or has not reported yet.
    #[default]
    Offline,
}

impl OnlineStatus {
    /// Parses a status payload, case-insensitively.
    ///
    /// Unrecognized text and invalid UTF-8 map to [`OnlineStatus::Offline`].
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        let text = String::from_utf8_lossy(payload);
        if text.trim().eq_ignore_ascii_case("online") {
            Self::Online
        } else {
            Self::Offline
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }

    /// Returns `true` if the device is online.
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for OnlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
