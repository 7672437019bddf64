// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT broker link for the device fleet.
//!
//! [`BrokerLink`] owns the single long-lived connection to the broker. A
//! background task runs the transport event loop: it re-issues the wildcard
//! subscriptions on every (re)connection acknowledgment, folds inbound
//! messages into the link's [`DeviceStateStore`], and keeps polling through
//! transport errors so the connection comes back on its own. Callers watch
//! the lifecycle through [`BrokerLink::status_stream`] instead of polling.
//!
//! # Examples
//!
//! ```no_run
//! use enermon_lib::protocol::BrokerLink;
//!
//! # async fn example() -> enermon_lib::Result<()> {
//! let link = BrokerLink::builder()
//!     .host("192.168.1.50")
//!     .port(1883)
//!     .credentials("user", "password")
//!     .build()
//!     .await?;
//!
//! let snapshot = link.store().snapshot();
//! println!("{} devices seen", snapshot.len());
//!
//! link.disconnect().await;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use crate::error::ProtocolError;
use crate::protocol::{CommandSink, ConnectionStatus, RoutedMessage};
use crate::state::DeviceStateStore;

/// The fixed wildcard subscriptions covering the whole fleet.
pub const SUBSCRIBED_TOPICS: [&str; 4] = [
    "dev/+/status",
    "dev/+/relay/state",
    "dev/+/pzem/metrics",
    "dev/+/pzem/energy",
];

/// Pause before polling again after a transport error, so a dead broker is
/// not hammered in a tight loop.
const RECONNECT_PAUSE: Duration = Duration::from_secs(1);

/// Configuration for a broker link.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
    connect_timeout: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// A connection to the MQTT broker carrying the device fleet.
///
/// `BrokerLink` is cheaply cloneable (via `Arc`); clones share the same
/// connection, store and status channel. The connection is established once
/// at build time, so lifecycle operations cannot race each other.
#[derive(Clone)]
pub struct BrokerLink {
    inner: Arc<LinkInner>,
}

struct LinkInner {
    /// The MQTT async client for publishing and subscribing.
    client: AsyncClient,
    /// Fleet state assembled from inbound messages.
    store: Arc<DeviceStateStore>,
    /// Lifecycle state, published to subscribers.
    status_tx: watch::Sender<ConnectionStatus>,
    /// Set by `disconnect()`; stops the event loop from reconnecting.
    closed: AtomicBool,
    /// Configuration used for this connection.
    config: BrokerConfig,
}

impl BrokerLink {
    /// Creates a new builder for configuring a broker link.
    #[must_use]
    pub fn builder() -> BrokerLinkBuilder {
        BrokerLinkBuilder::default()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.inner.status_tx.borrow()
    }

    /// Subscribes to lifecycle state changes.
    ///
    /// This is the way to await "connected": watch the stream rather than
    /// polling [`BrokerLink::status`].
    #[must_use]
    pub fn status_stream(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Returns whether the link is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Returns the fleet state store fed by this link.
    #[must_use]
    pub fn store(&self) -> Arc<DeviceStateStore> {
        Arc::clone(&self.inner.store)
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.config.port
    }

    /// Publishes a payload to a topic, fire-and-forget.
    ///
    /// Failures are logged and dropped; retrying, if wanted at all, is the
    /// caller's decision.
    pub fn publish(&self, topic: &str, payload: &str) {
        tracing::debug!(topic = %topic, payload = %payload, "Publishing message");
        if let Err(e) = self
            .inner
            .client
            .try_publish(topic, QoS::AtLeastOnce, false, payload)
        {
            tracing::warn!(topic = %topic, error = %e, "Failed to enqueue message");
        }
    }

    /// Disconnects from the broker, best-effort.
    ///
    /// Transport errors during disconnect are swallowed; locally the link
    /// always ends up `Disconnected` and stops reconnecting.
    pub async fn disconnect(&self) {
        tracing::info!(
            host = %self.inner.config.host,
            port = %self.inner.config.port,
            "Disconnecting from MQTT broker"
        );
        self.inner.closed.store(true, Ordering::Release);
        if let Err(e) = self.inner.client.disconnect().await {
            tracing::debug!(error = %e, "Ignoring disconnect error");
        }
        self.inner
            .status_tx
            .send_replace(ConnectionStatus::Disconnected);
    }
}

impl CommandSink for BrokerLink {
    fn send_command(&self, topic: &str, payload: &str) {
        self.publish(topic, payload);
    }
}

impl std::fmt::Debug for BrokerLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerLink")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("status", &self.status())
            .finish()
    }
}

/// Builder for creating a broker link.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use enermon_lib::protocol::BrokerLink;
///
/// # async fn example() -> enermon_lib::Result<()> {
/// let link = BrokerLink::builder()
///     .host("192.168.1.50")
///     .port(1883)
///     .keep_alive(Duration::from_secs(60))
///     .connect_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct BrokerLinkBuilder {
    config: BrokerConfig,
    store: Option<Arc<DeviceStateStore>>,
}

impl BrokerLinkBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.config.connect_timeout = duration;
        self
    }

    /// Feeds inbound messages into an existing store instead of a fresh one.
    #[must_use]
    pub fn store(mut self, store: Arc<DeviceStateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the link and connects to the broker.
    ///
    /// Resolves once the broker acknowledges the connection, or fails after
    /// the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the host is not set, the connection fails, or the
    /// connection times out.
    pub async fn build(self) -> Result<BrokerLink, ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = format!("enermon_{}", Uuid::new_v4().simple());
        let mut mqtt_options =
            MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);
        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        let (status_tx, _) = watch::channel(ConnectionStatus::Connecting);
        let inner = Arc::new(LinkInner {
            client,
            store: self.store.unwrap_or_default(),
            status_tx,
            closed: AtomicBool::new(false),
            config: self.config.clone(),
        });

        // Signals the first connection acknowledgment.
        let (connack_tx, connack_rx) = oneshot::channel();
        tokio::spawn(run_event_loop(
            event_loop,
            Arc::downgrade(&inner),
            Some(connack_tx),
        ));

        let timeout = self.config.connect_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                tracing::info!(
                    host = %self.config.host,
                    port = %self.config.port,
                    "Connected to MQTT broker"
                );
                Ok(BrokerLink { inner })
            }
            Ok(Err(_)) => {
                inner.status_tx.send_replace(ConnectionStatus::Error);
                Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ))
            }
            Err(_) => {
                inner.status_tx.send_replace(ConnectionStatus::Error);
                // Safe: practical timeouts never exceed u64::MAX milliseconds
                #[allow(clippy::cast_possible_truncation)]
                let timeout_ms = timeout.as_millis() as u64;
                Err(ProtocolError::Timeout(timeout_ms))
            }
        }
    }
}

/// Runs the transport event loop until the link is dropped or closed.
async fn run_event_loop(
    mut event_loop: EventLoop,
    link: Weak<LinkInner>,
    mut connack_tx: Option<oneshot::Sender<()>>,
) {
    use rumqttc::{Event, Packet};

    loop {
        let event = event_loop.poll().await;

        // The link owner is gone; nobody can observe us anymore.
        let Some(inner) = link.upgrade() else {
            return;
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                tracing::debug!(?ack, "MQTT connection acknowledged");
                // Brokers need not remember subscriptions across clean-session
                // reconnects, so the wildcard set is reissued on every ConnAck.
                let mut subscribed = true;
                for topic in SUBSCRIBED_TOPICS {
                    if let Err(e) = inner.client.subscribe(topic, QoS::AtLeastOnce).await {
                        tracing::error!(topic = %topic, error = %e, "Subscription failed");
                        subscribed = false;
                    }
                }
                inner.status_tx.send_replace(if subscribed {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Error
                });
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                ingest(&inner.store, &publish.topic, &publish.payload);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker requested disconnect");
                inner
                    .status_tx
                    .send_replace(ConnectionStatus::Disconnected);
            }
            Ok(_) => {}
            Err(e) => {
                if inner.closed.load(Ordering::Acquire) {
                    tracing::debug!("MQTT event loop stopped after disconnect");
                    return;
                }
                let lost_while = *inner.status_tx.borrow();
                tracing::error!(error = %e, "MQTT event loop error");
                inner.status_tx.send_replace(if lost_while == ConnectionStatus::Connecting {
                    ConnectionStatus::Error
                } else {
                    ConnectionStatus::Disconnected
                });
                drop(inner);
                // Polling again retries the connection; pace the attempts.
                tokio::time::sleep(RECONNECT_PAUSE).await;
            }
        }
    }
}

/// Folds one inbound message into the fleet store.
///
/// Topics this library does not consume are dropped here, silently.
fn ingest(store: &DeviceStateStore, topic: &str, payload: &[u8]) {
    match RoutedMessage::parse(topic) {
        Ok(message) => {
            tracing::debug!(
                device = %message.device_id,
                topic = %topic,
                "Applying inbound message"
            );
            store.apply_message(&message, payload);
        }
        Err(_) => {
            tracing::trace!(topic = %topic, "Ignoring unroutable topic");
        }
    }
}
