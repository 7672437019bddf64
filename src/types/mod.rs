// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the energy meter fleet.
//!
//! # Types
//!
//! - [`DeviceId`] - Opaque device identifier taken from the wire
//! - [`OnlineStatus`] - Online/Offline state reported by a device
//! - [`RelayState`] - On/Off state of a device's relay

mod device_id;
mod online;
mod relay;

pub use device_id::DeviceId;
pub use online::OnlineStatus;
pub use relay::RelayState;
