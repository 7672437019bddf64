// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Energy counter samples.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ParseError;

/// Wire format of backend timestamps, in UTC: `2025-11-11 19:22:28`.
const REST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One reading of a device's cumulative energy counter.
///
/// The counter is monotonic non-decreasing under normal operation, but that
/// is not assumed anywhere: meters reset, devices get replaced. Consumers
/// clamp negative deltas to zero instead of treating them as errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySample {
    /// When the counter was read.
    pub timestamp: DateTime<Utc>,
    /// Counter value in kWh.
    pub cumulative_kwh: f64,
}

impl EnergySample {
    /// Creates a sample.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, cumulative_kwh: f64) -> Self {
        Self {
            timestamp,
            cumulative_kwh,
        }
    }
}

/// Parses a backend timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
///
/// # Errors
///
/// Returns [`ParseError::InvalidTimestamp`] if the text does not match the
/// wire format.
pub fn parse_rest_timestamp(text: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(text, REST_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))
}

/// Formats an instant in the backend's timestamp format (UTC).
#[must_use]
pub fn format_rest_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(REST_TIMESTAMP_FORMAT).to_string()
}
