// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consumption analytics over cumulative energy counters.
//!
//! Devices report a running total of energy consumed; interval consumption
//! is the difference between two counter readings. This module buckets a
//! series of readings into fixed time windows for charting and computes
//! window totals and bill estimates.
//!
//! Everything here is a pure transform: samples in, readings out, no state.
//!
//! Bucket boundaries are computed in UTC as sliding windows anchored at
//! `now`; bucket *labels* use the viewer's timezone, so a user anywhere
//! sees culturally correct hour and day names while the windowing itself
//! stays unambiguous.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use enermon_lib::aggregate::{EnergySample, Period, aggregate_in, total_consumption};
//!
//! let now = Utc.with_ymd_and_hms(2025, 11, 11, 12, 0, 0).unwrap();
//! let samples = vec![
//!     EnergySample::new(now - Duration::hours(2), 42.7),
//!     EnergySample::new(now - Duration::hours(1), 45.1),
//! ];
//!
//! let readings = aggregate_in(&samples, Period::Daily, now, &Utc);
//! assert_eq!(readings.len(), 24);
//!
//! let total = total_consumption(&samples, Period::Daily, now);
//! assert!((total - 2.4).abs() < 1e-9);
//! ```

mod aggregator;
mod bucket;
mod sample;

pub use aggregator::{BucketReading, aggregate, aggregate_in, estimate_bill, total_consumption};
pub use bucket::{Bucket, Period, buckets_for};
pub use sample::{EnergySample, format_rest_timestamp, parse_rest_timestamp};
