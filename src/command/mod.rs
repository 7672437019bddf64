// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound device commands.
//!
//! The only command the fleet accepts today is a relay toggle. Commands are
//! pure translation: publishing `RELAY_ON` does not flip any local state,
//! the relay field changes only when the device confirms on `relay/state`.
//! The UI consequence is a visible delay between toggle and confirmation;
//! that is the intended consistency model.

use crate::protocol::{CommandSink, TOPIC_PREFIX};
use crate::types::{DeviceId, RelayState};

/// Returns the command topic of a device: `dev/<id>/relay/commands`.
#[must_use]
pub fn relay_command_topic(device_id: &DeviceId) -> String {
    format!("{TOPIC_PREFIX}/{device_id}/relay/commands")
}

/// Translates relay toggle intents into outbound command messages.
///
/// # Examples
///
/// ```no_run
/// use enermon_lib::{BrokerLink, DeviceId, RelayCommander};
///
/// # async fn example() -> enermon_lib::Result<()> {
/// let link = BrokerLink::builder().host("192.168.1.50").build().await?;
/// let commander = RelayCommander::new(link);
///
/// let id = DeviceId::new("ESP32-fa641d44").unwrap();
/// commander.set_relay(&id, true);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RelayCommander<S> {
    sink: S,
}

impl<S: CommandSink> RelayCommander<S> {
    /// Creates a commander publishing through the given sink.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Requests a relay change on one device, fire-and-forget.
    pub fn set_relay(&self, device_id: &DeviceId, on: bool) {
        let state = RelayState::from_bool(on);
        let topic = relay_command_topic(device_id);
        tracing::debug!(
            device = %device_id,
            command = %state.command_str(),
            "Sending relay command"
        );
        self.sink.send_command(&topic, state.command_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DeviceStateStore;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl CommandSink for RecordingSink {
        fn send_command(&self, topic: &str, payload: &str) {
            self.sent.lock().push((topic.to_string(), payload.to_string()));
        }
    }

    fn id(s: &str) -> DeviceId {
        DeviceId::new(s).unwrap()
    }

    #[test]
    fn relay_on_publishes_exactly_one_command() {
        let sink = RecordingSink::default();
        let commander = RelayCommander::new(&sink);

        commander.set_relay(&id("devA"), true);

        let sent = sink.sent.lock();
        assert_eq!(
            *sent,
            vec![("dev/devA/relay/commands".to_string(), "RELAY_ON".to_string())]
        );
    }

    #[test]
    fn relay_off_publishes_off_command() {
        let sink = RecordingSink::default();
        let commander = RelayCommander::new(&sink);

        commander.set_relay(&id("devA"), false);

        let sent = sink.sent.lock();
        assert_eq!(sent[0].1, "RELAY_OFF");
    }

    #[test]
    fn command_does_not_touch_device_state() {
        let store = DeviceStateStore::new();
        let sink = RecordingSink::default();
        let commander = RelayCommander::new(&sink);

        commander.set_relay(&id("devA"), true);

        // Only an authoritative relay/state report changes the store
        assert!(store.device(&id("devA")).is_none());

        store.apply(&id("devA"), crate::protocol::Subtopic::RelayState, b"1");
        assert_eq!(store.device(&id("devA")).unwrap().relay(), RelayState::On);
    }

    #[test]
    fn command_topic_shape() {
        assert_eq!(
            relay_command_topic(&id("ESP32-fa641d44")),
            "dev/ESP32-fa641d44/relay/commands"
        );
    }
}
