// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking for the fleet.
//!
//! [`DeviceState`] is the per-device snapshot assembled from inbound
//! messages; [`DeviceStateStore`] owns the mapping from device identifier
//! to snapshot and exposes it to readers as immutable versions.
//!
//! # Examples
//!
//! ```
//! use enermon_lib::protocol::Subtopic;
//! use enermon_lib::state::DeviceStateStore;
//! use enermon_lib::types::DeviceId;
//!
//! let store = DeviceStateStore::new();
//! let id = DeviceId::new("plug1").unwrap();
//!
//! store.apply(&id, Subtopic::Status, b"Online");
//!
//! let snapshot = store.snapshot();
//! assert!(snapshot[&id].status().is_online());
//! ```

mod device_state;
mod store;

pub use device_state::DeviceState;
pub use store::{DeviceMap, DeviceStateStore};
