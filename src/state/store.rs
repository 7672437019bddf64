// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Copy-on-write store for the fleet's device states.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::protocol::{RoutedMessage, Subtopic};
use crate::state::DeviceState;
use crate::telemetry::{PzemMetrics, parse_energy_kwh};
use crate::types::{DeviceId, OnlineStatus, RelayState};

/// An immutable version of the fleet mapping.
pub type DeviceMap = Arc<HashMap<DeviceId, DeviceState>>;

/// In-memory mapping from device identifier to its last known state.
///
/// The store is the sole mutator of [`DeviceState`] records. Every update
/// is a copy-on-write merge: the current mapping is cloned, only the
/// touched field of the touched device is replaced, and the new version is
/// published atomically. Readers therefore never observe a half-updated
/// record, and snapshots stay valid forever.
///
/// Updates are expected to come from a single inbound-message sequence (the
/// broker link's receive loop); a write lock makes concurrent `apply` calls
/// safe anyway, at a cost that is irrelevant at home-telemetry message
/// rates. Readers never block writers: [`DeviceStateStore::snapshot`] is an
/// `Arc` clone, and [`DeviceStateStore::subscribe`] hands out a watch
/// receiver that sees a strictly ordered sequence of mapping versions
/// (coalesced for slow readers, never interleaved).
#[derive(Debug)]
pub struct DeviceStateStore {
    devices: RwLock<DeviceMap>,
    watch_tx: watch::Sender<DeviceMap>,
}

impl DeviceStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let map: DeviceMap = Arc::new(HashMap::new());
        let (watch_tx, _) = watch::channel(Arc::clone(&map));
        Self {
            devices: RwLock::new(map),
            watch_tx,
        }
    }

    /// Returns a point-in-time copy of the fleet mapping.
    #[must_use]
    pub fn snapshot(&self) -> DeviceMap {
        Arc::clone(&self.devices.read())
    }

    /// Returns the state of a single device, if it has ever reported.
    #[must_use]
    pub fn device(&self, device_id: &DeviceId) -> Option<DeviceState> {
        self.devices.read().get(device_id).cloned()
    }

    /// Returns the number of devices seen so far.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Subscribes to mapping versions.
    ///
    /// The receiver holds the current version immediately and is notified
    /// on every subsequent update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeviceMap> {
        self.watch_tx.subscribe()
    }

    /// Applies one inbound message to the addressed device.
    ///
    /// The device is created with default state on its first message.
    /// Decoding is fail-soft: a malformed payload leaves the previously
    /// known value untouched.
    pub fn apply(&self, device_id: &DeviceId, subtopic: Subtopic, payload: &[u8]) {
        let mut guard = self.devices.write();
        let mut next: HashMap<DeviceId, DeviceState> = (**guard).clone();
        let state = next.entry(device_id.clone()).or_default();

        match subtopic {
            Subtopic::Status => {
                state.set_status(OnlineStatus::from_payload(payload));
            }
            Subtopic::RelayState => {
                state.set_relay(RelayState::from_payload(payload));
            }
            Subtopic::PzemMetrics => {
                if let Some(metrics) = PzemMetrics::decode(payload) {
                    state.set_metrics(metrics);
                } else {
                    tracing::debug!(device = %device_id, "Keeping previous metrics");
                }
            }
            Subtopic::PzemEnergy => {
                if let Some(kwh) = parse_energy_kwh(payload) {
                    state.set_cumulative_energy_kwh(kwh);
                } else {
                    tracing::debug!(device = %device_id, "Keeping previous energy counter");
                }
            }
        }

        let next: DeviceMap = Arc::new(next);
        *guard = Arc::clone(&next);
        // Publish while still holding the write lock so watch versions
        // cannot be reordered relative to the authoritative mapping.
        self.watch_tx.send_replace(next);
    }

    /// Applies a routed message; see [`DeviceStateStore::apply`].
    pub fn apply_message(&self, message: &RoutedMessage, payload: &[u8]) {
        self.apply(&message.device_id, message.subtopic, payload);
    }
}

impl Default for DeviceStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DeviceId {
        DeviceId::new(s).unwrap()
    }

    #[test]
    fn first_message_creates_device_with_defaults() {
        let store = DeviceStateStore::new();
        store.apply(&id("plug1"), Subtopic::PzemEnergy, b"42.7");

        let state = store.device(&id("plug1")).unwrap();
        assert_eq!(state.status(), OnlineStatus::Offline);
        assert_eq!(state.relay(), RelayState::Off);
        assert!(state.metrics().is_none());
        assert_eq!(state.cumulative_energy_kwh(), Some(42.7));
        assert_eq!(store.device_count(), 1);
    }

    #[test]
    fn status_update_is_idempotent() {
        let store = DeviceStateStore::new();

        store.apply(&id("plug1"), Subtopic::Status, b"Online");
        let once = store.snapshot();

        store.apply(&id("plug1"), Subtopic::Status, b"Online");
        let twice = store.snapshot();

        assert_eq!(*once, *twice);
        assert!(twice[&id("plug1")].status().is_online());
    }

    #[test]
    fn relay_update_touches_nothing_else() {
        let store = DeviceStateStore::new();
        store.apply(&id("plug1"), Subtopic::Status, b"Online");
        store.apply(
            &id("plug1"),
            Subtopic::PzemMetrics,
            br#"{"voltage":230.0,"current":0.5,"power":115.0}"#,
        );
        store.apply(&id("plug2"), Subtopic::Status, b"Online");

        store.apply(&id("plug1"), Subtopic::RelayState, b"1");

        let snapshot = store.snapshot();
        let plug1 = &snapshot[&id("plug1")];
        assert_eq!(plug1.relay(), RelayState::On);
        assert!(plug1.status().is_online());
        assert_eq!(plug1.metrics().unwrap().voltage, 230.0);

        // The other device is untouched
        let plug2 = &snapshot[&id("plug2")];
        assert_eq!(plug2.relay(), RelayState::Off);
        assert!(plug2.status().is_online());
    }

    #[test]
    fn malformed_metrics_keeps_last_known_good() {
        let store = DeviceStateStore::new();
        store.apply(
            &id("plug1"),
            Subtopic::PzemMetrics,
            br#"{"voltage":230.0,"current":0.5,"power":115.0}"#,
        );

        store.apply(&id("plug1"), Subtopic::PzemMetrics, b"{broken");

        let state = store.device(&id("plug1")).unwrap();
        assert_eq!(state.metrics().unwrap().power, 115.0);
    }

    #[test]
    fn malformed_metrics_on_fresh_device_stays_none() {
        let store = DeviceStateStore::new();
        store.apply(&id("plug1"), Subtopic::PzemMetrics, b"{broken");

        let state = store.device(&id("plug1")).unwrap();
        assert!(state.metrics().is_none());
    }

    #[test]
    fn malformed_energy_keeps_last_known_good() {
        let store = DeviceStateStore::new();
        store.apply(&id("plug1"), Subtopic::PzemEnergy, b"42.7");
        store.apply(&id("plug1"), Subtopic::PzemEnergy, b"bogus");

        let state = store.device(&id("plug1")).unwrap();
        assert_eq!(state.cumulative_energy_kwh(), Some(42.7));
    }

    #[test]
    fn unrecognized_status_text_is_offline() {
        let store = DeviceStateStore::new();
        store.apply(&id("plug1"), Subtopic::Status, b"Online");
        store.apply(&id("plug1"), Subtopic::Status, b"rebooting");

        let state = store.device(&id("plug1")).unwrap();
        assert_eq!(state.status(), OnlineStatus::Offline);
    }

    #[test]
    fn snapshot_is_point_in_time() {
        let store = DeviceStateStore::new();
        store.apply(&id("plug1"), Subtopic::PzemEnergy, b"42.7");

        let before = store.snapshot();
        store.apply(&id("plug1"), Subtopic::PzemEnergy, b"45.1");

        assert_eq!(before[&id("plug1")].cumulative_energy_kwh(), Some(42.7));
        assert_eq!(
            store.snapshot()[&id("plug1")].cumulative_energy_kwh(),
            Some(45.1)
        );
    }

    #[test]
    fn apply_message_routes_to_the_addressed_device() {
        let store = DeviceStateStore::new();
        let message = RoutedMessage::parse("dev/AB12/pzem/energy").unwrap();
        store.apply_message(&message, b"42.7");

        assert_eq!(
            store.device(&id("AB12")).unwrap().cumulative_energy_kwh(),
            Some(42.7)
        );
    }

    #[tokio::test]
    async fn subscribers_observe_new_versions() {
        let store = DeviceStateStore::new();
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_empty());

        store.apply(&id("plug1"), Subtopic::Status, b"Online");

        rx.changed().await.unwrap();
        let map = rx.borrow_and_update();
        assert!(map[&id("plug1")].status().is_online());
    }
}
