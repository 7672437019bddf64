// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time windows for consumption charts.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Charting period selected by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// The last 24 hours, in hourly buckets.
    Daily,
    /// The last 7 days, in daily buckets.
    Weekly,
    /// The last 30 days, in daily buckets.
    Monthly,
}

impl Period {
    /// Number of buckets in this period's chart.
    #[must_use]
    pub const fn bucket_count(self) -> usize {
        match self {
            Self::Daily => 24,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// Width of one bucket.
    #[must_use]
    pub fn bucket_width(self) -> Duration {
        match self {
            Self::Daily => Duration::hours(1),
            Self::Weekly | Self::Monthly => Duration::days(1),
        }
    }

    /// Total span covered by the period's buckets.
    #[must_use]
    pub fn span(self) -> Duration {
        match self {
            Self::Daily => Duration::hours(24),
            Self::Weekly => Duration::days(7),
            Self::Monthly => Duration::days(30),
        }
    }

    /// Renders the chart label for a bucket starting at `local_start`.
    ///
    /// Daily buckets are labeled `HH:00`, weekly buckets by 3-letter
    /// weekday, monthly buckets as `M/D`.
    pub(crate) fn label<Tz: TimeZone>(self, local_start: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            Self::Daily => local_start.format("%H:00").to_string(),
            Self::Weekly => local_start.format("%a").to_string(),
            Self::Monthly => format!("{}/{}", local_start.month(), local_start.day()),
        }
    }
}

/// One pre-generated chart window.
///
/// Windows are half-open `[window_start, window_end)` and generated for the
/// whole period regardless of sample coverage, so gaps chart as zero
/// instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Chart label, rendered in the viewer's timezone.
    pub label: String,
    /// Inclusive window start (UTC).
    pub window_start: DateTime<Utc>,
    /// Exclusive window end (UTC).
    pub window_end: DateTime<Utc>,
}

/// Generates the period's bucket list as sliding windows anchored at `now`.
///
/// Boundaries are UTC; labels are rendered in `tz`.
#[must_use]
pub fn buckets_for<Tz: TimeZone>(period: Period, now: DateTime<Utc>, tz: &Tz) -> Vec<Bucket>
where
    Tz::Offset: fmt::Display,
{
    let width = period.bucket_width();
    let mut window_start = now - period.span();

    let mut buckets = Vec::with_capacity(period.bucket_count());
    for _ in 0..period.bucket_count() {
        let window_end = window_start + width;
        buckets.push(Bucket {
            label: period.label(&window_start.with_timezone(tz)),
            window_start,
            window_end,
        });
        window_start = window_end;
    }
    buckets
}
