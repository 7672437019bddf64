// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bucketed consumption from counter samples.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

use super::bucket::{Period, buckets_for};
use super::sample::EnergySample;

/// Consumption computed for one chart bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketReading {
    /// Chart label, rendered in the viewer's timezone.
    pub label: String,
    /// Inclusive window start (UTC).
    pub window_start: DateTime<Utc>,
    /// Exclusive window end (UTC).
    pub window_end: DateTime<Utc>,
    /// Energy consumed within the window, in kWh. Never negative.
    pub consumption_kwh: f64,
}

/// Buckets counter samples into the period's chart windows, labeling them
/// in the viewer's local timezone.
///
/// See [`aggregate_in`] for the full contract.
#[must_use]
pub fn aggregate(samples: &[EnergySample], period: Period, now: DateTime<Utc>) -> Vec<BucketReading> {
    aggregate_in(samples, period, now, &Local)
}

/// Buckets counter samples into the period's chart windows, labeling them
/// in the given timezone.
///
/// Consumption per bucket is the counter delta between the last sample at
/// or before the window end and the last sample at or before the window
/// start (the carry-in baseline). A bucket without two distinct qualifying
/// samples reads zero, and so does a bucket where the counter decreased;
/// meter resets chart as a gap, not as an error. The full bucket list is
/// always returned, zero-filled, so the chart shape is independent of
/// sample coverage.
///
/// Input order does not matter; samples are sorted defensively.
#[must_use]
pub fn aggregate_in<Tz: TimeZone>(
    samples: &[EnergySample],
    period: Period,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<BucketReading>
where
    Tz::Offset: fmt::Display,
{
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|sample| sample.timestamp);

    buckets_for(period, now, tz)
        .into_iter()
        .map(|bucket| {
            let baseline = last_at_or_before(&sorted, bucket.window_start);
            let end = last_at_or_before(&sorted, bucket.window_end);
            let consumption_kwh = match (baseline, end) {
                (Some(first), Some(last)) if last > first => {
                    (sorted[last].cumulative_kwh - sorted[first].cumulative_kwh).max(0.0)
                }
                _ => 0.0,
            };
            BucketReading {
                label: bucket.label,
                window_start: bucket.window_start,
                window_end: bucket.window_end,
                consumption_kwh,
            }
        })
        .collect()
}

/// Total consumption over the period's window ending at `now`, in kWh.
///
/// Computed as last counter minus first counter over the samples falling
/// inside the window, clamped at zero. With a monotonic counter and a
/// sample on every bucket boundary this equals the sum of the bucket
/// readings.
#[must_use]
pub fn total_consumption(samples: &[EnergySample], period: Period, now: DateTime<Utc>) -> f64 {
    let window_start = now - period.span();

    let mut in_window: Vec<&EnergySample> = samples
        .iter()
        .filter(|sample| sample.timestamp >= window_start && sample.timestamp <= now)
        .collect();
    in_window.sort_by_key(|sample| sample.timestamp);

    match in_window.as_slice() {
        [] | [_] => 0.0,
        [first, .., last] => (last.cumulative_kwh - first.cumulative_kwh).max(0.0),
    }
}

/// Estimated cost of the consumed energy at a flat tariff.
///
/// The price per kWh is configuration owned by the caller.
#[must_use]
pub fn estimate_bill(total_kwh: f64, price_per_kwh: f64) -> f64 {
    total_kwh * price_per_kwh
}

/// Index of the last sample taken at or before `instant`, if any.
fn last_at_or_before(sorted: &[EnergySample], instant: DateTime<Utc>) -> Option<usize> {
    let idx = sorted.partition_point(|sample| sample.timestamp <= instant);
    idx.checked_sub(1)
}
