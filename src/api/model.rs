// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire types of the smart meter REST backend.

use serde::{Deserialize, Serialize};

use crate::aggregate::{EnergySample, parse_rest_timestamp};

/// One stored energy reading, as returned by the energy endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnergyReading {
    /// Cumulative counter value in kWh.
    pub energy_kwh: f64,
    /// Reading time as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub timestamp: String,
}

impl EnergyReading {
    /// Converts this reading into an aggregation sample.
    ///
    /// Readings with timestamps the backend should never have produced are
    /// dropped with a warning rather than failing the whole series.
    #[must_use]
    pub fn to_sample(&self) -> Option<EnergySample> {
        match parse_rest_timestamp(&self.timestamp) {
            Ok(timestamp) => Some(EnergySample::new(timestamp, self.energy_kwh)),
            Err(_) => {
                tracing::warn!(
                    timestamp = %self.timestamp,
                    "Skipping reading with unparseable timestamp"
                );
                None
            }
        }
    }
}

/// A device known to the backend, with its most recent activity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceSummary {
    /// The device identifier.
    pub client_id: String,
    /// Timestamp of the last stored reading.
    pub last_seen: String,
    /// Most recent counter value in kWh.
    pub current_energy_kwh: f64,
}

/// Calendar-aligned aggregation period understood by the backend.
///
/// Unlike [`crate::aggregate::Period`], which charts sliding windows ending
/// now, these aggregates are computed server-side from the start of the
/// current calendar day, week or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarPeriod {
    /// Since midnight today.
    Day,
    /// Since Monday this week.
    Week,
    /// Since the first of this month.
    Month,
}

impl CalendarPeriod {
    /// Returns the query parameter value for this period.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// A relay schedule stored on the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schedule {
    /// Schedule identifier.
    pub id: i64,
    /// The device this schedule drives.
    pub client_id: String,
    /// `"daily"` or `"timer"`.
    pub schedule_type: String,
    /// Daily schedules: start time as `HH:MM`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Daily schedules: end time as `HH:MM`.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Daily schedules: comma-separated weekday numbers, e.g. `"0,1,2,3,4"`.
    #[serde(default)]
    pub days_of_week: Option<String>,
    /// Timer schedules: run time in seconds.
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    /// 1 when active.
    pub enabled: i64,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parameters for creating or replacing a schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleSpec {
    /// Switch the relay on between two wall-clock times on given weekdays.
    Daily {
        /// Start time as `HH:MM`.
        start_time: String,
        /// End time as `HH:MM`.
        end_time: String,
        /// Comma-separated weekday numbers; `None` means every day.
        days_of_week: Option<String>,
    },
    /// Switch the relay on for a fixed duration, once.
    Timer {
        /// Run time in seconds.
        duration_seconds: u32,
    },
}

impl ScheduleSpec {
    /// Renders the request body fields for this spec.
    pub(crate) fn body_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        match self {
            Self::Daily {
                start_time,
                end_time,
                days_of_week,
            } => {
                fields.insert("schedule_type".into(), "daily".into());
                fields.insert("start_time".into(), start_time.clone().into());
                fields.insert("end_time".into(), end_time.clone().into());
                if let Some(days) = days_of_week {
                    fields.insert("days_of_week".into(), days.clone().into());
                }
            }
            Self::Timer { duration_seconds } => {
                fields.insert("schedule_type".into(), "timer".into());
                fields.insert("duration_seconds".into(), (*duration_seconds).into());
            }
        }
        fields
    }
}

/// How often a consumption threshold resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPeriod {
    /// Reset at midnight.
    Daily,
    /// Reset every Monday.
    Weekly,
    /// Reset on the first of the month.
    Monthly,
}

impl ResetPeriod {
    /// Returns the wire value of this period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A consumption threshold stored on the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Threshold {
    /// Threshold identifier.
    pub id: i64,
    /// The device this threshold watches.
    pub client_id: String,
    /// Consumption limit in kWh per reset period.
    pub limit_kwh: f64,
    /// How often the accumulated consumption resets.
    pub reset_period: ResetPeriod,
    /// 1 when active.
    pub enabled: i64,
    /// When the accumulation last reset.
    #[serde(default)]
    pub last_reset: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Response envelopes. The backend wraps everything in {"success": ..., ...}.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub devices: Vec<DeviceSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnergyReadingsResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub readings: Vec<EnergyReading>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregateConsumptionResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub consumption_kwh: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchedulesResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThresholdResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub threshold: Option<Threshold>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AckResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    #[allow(dead_code)] // informational, useful when tracing responses
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_converts_to_sample() {
        let reading = EnergyReading {
            energy_kwh: 42.7,
            timestamp: "2025-11-11 19:22:28".to_string(),
        };
        let sample = reading.to_sample().unwrap();
        assert_eq!(sample.cumulative_kwh, 42.7);
    }

    #[test]
    fn reading_with_bad_timestamp_is_dropped() {
        let reading = EnergyReading {
            energy_kwh: 42.7,
            timestamp: "tomorrow-ish".to_string(),
        };
        assert!(reading.to_sample().is_none());
    }

    #[test]
    fn schedule_deserializes_with_missing_optionals() {
        let schedule: Schedule = serde_json::from_str(
            r#"{"id":3,"client_id":"plug1","schedule_type":"timer","duration_seconds":120,"enabled":1}"#,
        )
        .unwrap();
        assert_eq!(schedule.duration_seconds, Some(120));
        assert!(schedule.start_time.is_none());
    }

    #[test]
    fn daily_spec_body_fields() {
        let spec = ScheduleSpec::Daily {
            start_time: "08:00".to_string(),
            end_time: "20:00".to_string(),
            days_of_week: Some("0,1,2,3,4".to_string()),
        };
        let fields = spec.body_fields();
        assert_eq!(fields["schedule_type"], "daily");
        assert_eq!(fields["start_time"], "08:00");
        assert_eq!(fields["days_of_week"], "0,1,2,3,4");
    }

    #[test]
    fn timer_spec_body_fields() {
        let spec = ScheduleSpec::Timer {
            duration_seconds: 120,
        };
        let fields = spec.body_fields();
        assert_eq!(fields["schedule_type"], "timer");
        assert_eq!(fields["duration_seconds"], 120);
        assert!(!fields.contains_key("start_time"));
    }

    #[test]
    fn threshold_deserializes_from_backend_row() {
        let threshold: Threshold = serde_json::from_str(
            r#"{"id":1,"client_id":"plug1","limit_kwh":1.5,"reset_period":"daily","enabled":1,"last_reset":"2025-11-11 00:00:00","created_at":"2025-11-01 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(threshold.reset_period, ResetPeriod::Daily);
        assert_eq!(threshold.limit_kwh, 1.5);
    }

    #[test]
    fn calendar_period_query_values() {
        assert_eq!(CalendarPeriod::Day.as_query(), "day");
        assert_eq!(CalendarPeriod::Week.as_query(), "week");
        assert_eq!(CalendarPeriod::Month.as_query(), "month");
    }
}
