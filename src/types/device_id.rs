// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;

/// Identifier of a device in the fleet.
///
/// This is the opaque, non-empty string a device announces itself with in
/// its topics (e.g. `ESP32-fa641d44`). There is no registration step: a
/// device exists as soon as a message carrying its identifier arrives.
/// Comparison is exact and case-sensitive.
///
/// # Examples
///
/// ```
/// use enermon_lib::types::DeviceId;
///
/// let id = DeviceId::new("ESP32-fa641d44").unwrap();
/// assert_eq!(id.as_str(), "ESP32-fa641d44");
///
/// // Empty identifiers are rejected
/// assert!(DeviceId::new("").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device identifier, rejecting empty strings.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_id() {
        let id = DeviceId::new("ESP32-fa641d44").unwrap();
        assert_eq!(id.as_str(), "ESP32-fa641d44");
        assert_eq!(id.to_string(), "ESP32-fa641d44");
    }

    #[test]
    fn rejects_empty_id() {
        assert!(DeviceId::new("").is_none());
        assert!(DeviceId::new(String::new()).is_none());
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let lower = DeviceId::new("esp32-ab").unwrap();
        let upper = DeviceId::new("ESP32-AB").unwrap();
        assert_ne!(lower, upper);
    }
}
