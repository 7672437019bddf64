// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsers for device telemetry payloads.
//!
//! Decoding is fail-soft throughout: a corrupt live sample must never take
//! down the pipeline, so parse failures yield `None` and the caller keeps
//! whatever value it had before.

mod energy;
mod metrics;

pub use energy::parse_energy_kwh;
pub use metrics::PzemMetrics;
