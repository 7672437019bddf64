// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device state snapshot.

use crate::telemetry::PzemMetrics;
use crate::types::{OnlineStatus, RelayState};

/// Last known state of one device.
///
/// Fields arrive independently and out of order, one message at a time, so
/// each has its own default until the device reports it: a brand-new device
/// is `Offline`, relay `Off`, with no sensor readings. The record is only
/// ever field-merged, never replaced wholesale, and never deleted (no topic
/// exists to retire a device).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    /// Whether the device is reachable.
    status: OnlineStatus,
    /// Relay state as last reported by the device.
    relay: RelayState,
    /// Instantaneous sensor readings, present after the first valid
    /// metrics message.
    metrics: Option<PzemMetrics>,
    /// Last-seen cumulative energy counter in kWh.
    cumulative_energy_kwh: Option<f64>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the online status.
    #[must_use]
    pub fn status(&self) -> OnlineStatus {
        self.status
    }

    /// Sets the online status.
    pub fn set_status(&mut self, status: OnlineStatus) {
        self.status = status;
    }

    /// Gets the relay state.
    #[must_use]
    pub fn relay(&self) -> RelayState {
        self.relay
    }

    /// Sets the relay state.
    pub fn set_relay(&mut self, relay: RelayState) {
        self.relay = relay;
    }

    /// Gets the latest sensor readings, if any have arrived.
    #[must_use]
    pub fn metrics(&self) -> Option<PzemMetrics> {
        self.metrics
    }

    /// Sets the sensor readings.
    pub fn set_metrics(&mut self, metrics: PzemMetrics) {
        self.metrics = Some(metrics);
    }

    /// Gets the last-seen cumulative energy counter in kWh.
    #[must_use]
    pub fn cumulative_energy_kwh(&self) -> Option<f64> {
        self.cumulative_energy_kwh
    }

    /// Sets the cumulative energy counter.
    pub fn set_cumulative_energy_kwh(&mut self, kwh: f64) {
        self.cumulative_energy_kwh = Some(kwh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_explicit_defaults() {
        let state = DeviceState::new();
        assert_eq!(state.status(), OnlineStatus::Offline);
        assert_eq!(state.relay(), RelayState::Off);
        assert!(state.metrics().is_none());
        assert!(state.cumulative_energy_kwh().is_none());
    }

    #[test]
    fn fields_update_independently() {
        let mut state = DeviceState::new();

        state.set_status(OnlineStatus::Online);
        assert_eq!(state.relay(), RelayState::Off);
        assert!(state.metrics().is_none());

        state.set_relay(RelayState::On);
        assert_eq!(state.status(), OnlineStatus::Online);

        state.set_cumulative_energy_kwh(42.7);
        assert_eq!(state.cumulative_energy_kwh(), Some(42.7));
        assert_eq!(state.relay(), RelayState::On);
    }
}
