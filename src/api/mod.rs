// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed client for the smart meter REST backend.
//!
//! The backend records the fleet's energy readings and owns schedules and
//! consumption thresholds; this module wraps its JSON-over-HTTP surface.
//! Historical readings fetched here feed the [`crate::aggregate`] module.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use enermon_lib::aggregate::{Period, aggregate};
//! use enermon_lib::api::{ApiClient, ApiConfig};
//! use enermon_lib::types::DeviceId;
//!
//! # async fn example() -> enermon_lib::Result<()> {
//! let client = ApiClient::new(ApiConfig::new("mqttpi.local"))?;
//! let device = DeviceId::new("ESP32-fa641d44").unwrap();
//!
//! let now = Utc::now();
//! let samples = client
//!     .energy_samples(&device, now - Duration::hours(24), now)
//!     .await?;
//! let chart = aggregate(&samples, Period::Daily, now);
//! # Ok(())
//! # }
//! ```

mod client;
mod model;

pub use client::{ApiClient, ApiConfig};
pub use model::{
    CalendarPeriod, DeviceSummary, EnergyReading, ResetPeriod, Schedule, ScheduleSpec, Threshold,
};
