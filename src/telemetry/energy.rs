// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the cumulative energy counter payload.

/// Parses a `dev/<id>/pzem/energy` payload: a bare float in kWh as text.
///
/// Returns `None` for invalid UTF-8, unparseable text and non-finite
/// values; the caller retains its previous counter in that case.
///
/// # Examples
///
/// ```
/// use enermon_lib::telemetry::parse_energy_kwh;
///
/// assert_eq!(parse_energy_kwh(b"42.7"), Some(42.7));
/// assert_eq!(parse_energy_kwh(b"bogus"), None);
/// ```
#[must_use]
pub fn parse_energy_kwh(payload: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(payload).ok()?;
    let value = text.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_float() {
        assert_eq!(parse_energy_kwh(b"42.7"), Some(42.7));
        assert_eq!(parse_energy_kwh(b"0"), Some(0.0));
        assert_eq!(parse_energy_kwh(b"12345.678"), Some(12345.678));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_energy_kwh(b" 45.1\n"), Some(45.1));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_energy_kwh(b""), None);
        assert_eq!(parse_energy_kwh(b"abc"), None);
        assert_eq!(parse_energy_kwh(b"42.7 kWh"), None);
        assert_eq!(parse_energy_kwh(&[0xff, 0xfe]), None);
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(parse_energy_kwh(b"NaN"), None);
        assert_eq!(parse_energy_kwh(b"inf"), None);
        assert_eq!(parse_energy_kwh(b"-inf"), None);
    }
}
