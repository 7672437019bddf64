// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `EnerMon` Lib - A Rust library for home energy meter fleets.
//!
//! This library provides async APIs to watch and control a fleet of
//! MQTT-connected energy meter devices, and to chart their consumption
//! history from the companion REST backend.
//!
//! # Supported Features
//!
//! - **Live fleet state**: online status, relay state and PZEM sensor
//!   readings folded into per-device snapshots with a reactive view
//! - **Relay control**: device-authoritative on/off commands
//! - **Consumption analytics**: hourly/daily bucketing of cumulative
//!   energy counters, window totals, bill estimation
//! - **Backend access**: energy history, schedules and thresholds
//!
//! # Quick Start
//!
//! ## Watching the fleet over MQTT
//!
//! ```no_run
//! use enermon_lib::{BrokerLink, DeviceId, RelayCommander};
//!
//! #[tokio::main]
//! async fn main() -> enermon_lib::Result<()> {
//!     let link = BrokerLink::builder()
//!         .host("192.168.1.50")
//!         .port(1883)
//!         .build()
//!         .await?;
//!
//!     // React to every fleet state change
//!     let mut devices = link.store().subscribe();
//!     devices.changed().await.ok();
//!     for (id, state) in devices.borrow_and_update().iter() {
//!         println!("{id}: {} relay {}", state.status(), state.relay());
//!     }
//!
//!     // Toggle a relay; the state updates once the device confirms
//!     let commander = RelayCommander::new(link.clone());
//!     if let Some(id) = DeviceId::new("ESP32-fa641d44") {
//!         commander.set_relay(&id, true);
//!     }
//!
//!     link.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Charting consumption history
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use enermon_lib::aggregate::{Period, aggregate, estimate_bill, total_consumption};
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
//!
//! let chart = aggregate(&samples, Period::Daily, now);
//! let total = total_consumption(&samples, Period::Daily, now);
//! println!("last 24h: {total:.2} kWh (₱{:.2})", estimate_bill(total, 10.0));
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
#[cfg(feature = "http")]
pub mod api;
pub mod command;
pub mod error;
pub mod protocol;
pub mod state;
pub mod telemetry;
pub mod types;

pub use aggregate::{BucketReading, EnergySample, Period, aggregate, estimate_bill, total_consumption};
#[cfg(feature = "http")]
pub use api::{ApiClient, ApiConfig};
pub use command::RelayCommander;
#[cfg(feature = "http")]
pub use error::ApiError;
pub use error::{Error, ParseError, ProtocolError, Result};
#[cfg(feature = "mqtt")]
pub use protocol::{BrokerConfig, BrokerLink, BrokerLinkBuilder};
pub use protocol::{CommandSink, ConnectionStatus, RoutedMessage, Subtopic};
pub use state::{DeviceState, DeviceStateStore};
pub use telemetry::PzemMetrics;
pub use types::{DeviceId, OnlineStatus, RelayState};
