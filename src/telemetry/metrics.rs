// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for PZEM sensor metrics messages.

use serde::Deserialize;

/// Instantaneous electrical readings from a device's PZEM sensor.
///
/// Received as JSON on `dev/<id>/pzem/metrics`:
///
/// ```json
/// {"voltage": 229.8, "current": 0.65, "power": 149.4}
/// ```
///
/// # Examples
///
/// ```
/// use enermon_lib::telemetry::PzemMetrics;
///
/// let metrics = PzemMetrics::decode(br#"{"voltage":230.1,"current":0.5,"power":115.0}"#).unwrap();
/// assert_eq!(metrics.voltage, 230.1);
/// assert_eq!(metrics.power, 115.0);
///
/// // Malformed payloads decode to None, never an error
/// assert!(PzemMetrics::decode(b"not json").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PzemMetrics {
    /// Line voltage in Volts.
    pub voltage: f64,
    /// Load current in Amperes.
    pub current: f64,
    /// Active power in Watts.
    pub power: f64,
}

impl PzemMetrics {
    /// Decodes a metrics payload.
    ///
    /// Returns `None` for malformed JSON, missing fields or non-numeric
    /// values; the caller retains its previous readings in that case.
    #[must_use]
    pub fn decode(payload: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Self>(payload) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed metrics payload");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_payload() {
        let metrics =
            PzemMetrics::decode(br#"{"voltage":229.8,"current":0.65,"power":149.4}"#).unwrap();
        assert_eq!(metrics.voltage, 229.8);
        assert_eq!(metrics.current, 0.65);
        assert_eq!(metrics.power, 149.4);
    }

    #[test]
    fn decodes_integer_values() {
        let metrics = PzemMetrics::decode(br#"{"voltage":230,"current":1,"power":230}"#).unwrap();
        assert_eq!(metrics.voltage, 230.0);
    }

    #[test]
    fn tolerates_extra_fields() {
        let metrics = PzemMetrics::decode(
            br#"{"voltage":230.0,"current":0.5,"power":115.0,"frequency":60.0}"#,
        )
        .unwrap();
        assert_eq!(metrics.current, 0.5);
    }

    #[test]
    fn rejects_missing_field() {
        assert!(PzemMetrics::decode(br#"{"voltage":230.0,"current":0.5}"#).is_none());
    }

    #[test]
    fn rejects_non_numeric_field() {
        assert!(PzemMetrics::decode(br#"{"voltage":"high","current":0.5,"power":1.0}"#).is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(PzemMetrics::decode(b"").is_none());
        assert!(PzemMetrics::decode(b"{").is_none());
        assert!(PzemMetrics::decode(b"not json at all").is_none());
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(PzemMetrics::decode(&[0xff, 0xfe, 0x00]).is_none());
    }
}
