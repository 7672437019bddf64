// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the smart meter REST backend.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::aggregate::{EnergySample, format_rest_timestamp};
use crate::error::ApiError;
use crate::types::DeviceId;

use super::model::{
    AckResponse, AggregateConsumptionResponse, CalendarPeriod, DeviceSummary, DevicesResponse,
    EnergyReading, EnergyReadingsResponse, Envelope, ResetPeriod, Schedule, SchedulesResponse,
    ScheduleSpec, Threshold, ThresholdResponse,
};

/// Configuration for the REST backend connection.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use enermon_lib::api::ApiConfig;
///
/// let config = ApiConfig::new("mqttpi.local")
///     .with_port(5001)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://mqttpi.local:5001");
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    host: String,
    port: u16,
    use_https: bool,
    timeout: Duration,
}

impl ApiConfig {
    /// Default backend port.
    pub const DEFAULT_PORT: u16 = 5001;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

/// Client for the smart meter REST backend.
///
/// All methods map one-to-one onto backend endpoints. The backend wraps
/// responses in a `{"success": ..., ...}` envelope; a `success: false`
/// envelope or a non-2xx status surfaces as [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(Self { config, client })
    }

    /// Lists the devices the backend has readings for.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn devices(&self) -> Result<Vec<DeviceSummary>, ApiError> {
        let url = format!("{}/api/devices", self.config.base_url());
        let response: DevicesResponse = self.get_json(&url).await?;
        accept(response.envelope)?;
        Ok(response.devices)
    }

    /// Fetches the recent energy readings of a device.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn energy_readings(&self, device: &DeviceId) -> Result<Vec<EnergyReading>, ApiError> {
        let url = format!(
            "{}/api/energy/{}",
            self.config.base_url(),
            urlencoding::encode(device.as_str())
        );
        let response: EnergyReadingsResponse = self.get_json(&url).await?;
        accept(response.envelope)?;
        Ok(response.readings)
    }

    /// Fetches the energy readings of a device within a UTC time range.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn energy_readings_range(
        &self,
        device: &DeviceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<EnergyReading>, ApiError> {
        let url = format!(
            "{}/api/energy/{}/range?start={}&end={}",
            self.config.base_url(),
            urlencoding::encode(device.as_str()),
            urlencoding::encode(&format_rest_timestamp(start)),
            urlencoding::encode(&format_rest_timestamp(end)),
        );
        let response: EnergyReadingsResponse = self.get_json(&url).await?;
        accept(response.envelope)?;
        Ok(response.readings)
    }

    /// Fetches a device's readings in a range, converted to aggregation
    /// samples. Readings with unusable timestamps are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn energy_samples(
        &self,
        device: &DeviceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<EnergySample>, ApiError> {
        let readings = self.energy_readings_range(device, start, end).await?;
        Ok(readings.iter().filter_map(EnergyReading::to_sample).collect())
    }

    /// Fetches the server-computed consumption of the current calendar
    /// day, week or month, in kWh.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn aggregate_consumption(
        &self,
        device: &DeviceId,
        period: CalendarPeriod,
    ) -> Result<f64, ApiError> {
        let url = format!(
            "{}/api/energy/{}?period={}",
            self.config.base_url(),
            urlencoding::encode(device.as_str()),
            period.as_query(),
        );
        let response: AggregateConsumptionResponse = self.get_json(&url).await?;
        accept(response.envelope)?;
        Ok(response.consumption_kwh)
    }

    /// Lists a device's relay schedules.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn schedules(&self, device: &DeviceId) -> Result<Vec<Schedule>, ApiError> {
        let url = format!(
            "{}/api/schedules/{}",
            self.config.base_url(),
            urlencoding::encode(device.as_str())
        );
        let response: SchedulesResponse = self.get_json(&url).await?;
        accept(response.envelope)?;
        Ok(response.schedules)
    }

    /// Creates a relay schedule for a device.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn create_schedule(
        &self,
        device: &DeviceId,
        spec: &ScheduleSpec,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/schedules", self.config.base_url());
        let mut body = spec.body_fields();
        body.insert("client_id".into(), json!(device.as_str()));

        let response = self.client.post(&url).json(&body).send().await?;
        let ack: AckResponse = read_json(response).await?;
        accept(ack.envelope)
    }

    /// Replaces a schedule's parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn update_schedule(
        &self,
        schedule_id: i64,
        spec: &ScheduleSpec,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/schedules/{schedule_id}", self.config.base_url());
        let response = self
            .client
            .put(&url)
            .json(&spec.body_fields())
            .send()
            .await?;
        let ack: AckResponse = read_json(response).await?;
        accept(ack.envelope)
    }

    /// Enables or disables a schedule without changing its parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn set_schedule_enabled(
        &self,
        schedule_id: i64,
        enabled: bool,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/schedules/{schedule_id}", self.config.base_url());
        let body = json!({ "enabled": if enabled { "1" } else { "0" } });

        let response = self.client.put(&url).json(&body).send().await?;
        let ack: AckResponse = read_json(response).await?;
        accept(ack.envelope)
    }

    /// Deletes a schedule.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn delete_schedule(&self, schedule_id: i64) -> Result<(), ApiError> {
        let url = format!("{}/api/schedules/{schedule_id}", self.config.base_url());
        let response = self.client.delete(&url).send().await?;
        let ack: AckResponse = read_json(response).await?;
        accept(ack.envelope)
    }

    /// Fetches a device's consumption threshold, if one is set.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn threshold(&self, device: &DeviceId) -> Result<Option<Threshold>, ApiError> {
        let url = format!(
            "{}/api/thresholds/{}",
            self.config.base_url(),
            urlencoding::encode(device.as_str())
        );
        let response = self.client.get(&url).send().await?;
        // "No threshold" is a normal answer, not a failure
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: ThresholdResponse = read_json(response).await?;
        accept(body.envelope)?;
        Ok(body.threshold)
    }

    /// Sets or replaces a device's consumption threshold.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn set_threshold(
        &self,
        device: &DeviceId,
        limit_kwh: f64,
        reset_period: ResetPeriod,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/api/thresholds/{}",
            self.config.base_url(),
            urlencoding::encode(device.as_str())
        );
        let body = json!({
            "limit_kwh": limit_kwh,
            "reset_period": reset_period.as_str(),
        });

        let response = self.client.put(&url).json(&body).send().await?;
        let ack: AckResponse = read_json(response).await?;
        accept(ack.envelope)
    }

    /// Removes a device's consumption threshold.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports failure.
    pub async fn delete_threshold(&self, device: &DeviceId) -> Result<(), ApiError> {
        let url = format!(
            "{}/api/thresholds/{}",
            self.config.base_url(),
            urlencoding::encode(device.as_str())
        );
        let response = self.client.delete(&url).send().await?;
        let ack: AckResponse = read_json(response).await?;
        accept(ack.envelope)
    }

    /// Performs a GET request and decodes the response body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }
}

/// Decodes a response body, mapping non-2xx statuses to errors.
///
/// The backend puts a usable message in its error envelope even on 4xx/5xx
/// responses; prefer that over the bare status code.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if let Ok(envelope) = serde_json::from_str::<Envelope>(&body)
            && let Some(error) = envelope.error
        {
            return Err(ApiError::Rejected(error));
        }
        return Err(ApiError::Status(status.as_u16()));
    }
    response.json::<T>().await.map_err(ApiError::Http)
}

/// Rejects envelopes the backend marked as failed.
fn accept(envelope: Envelope) -> Result<(), ApiError> {
    if envelope.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(envelope.error.unwrap_or_else(|| {
            "unspecified server error".to_string()
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = ApiConfig::new("mqttpi.local");
        assert_eq!(config.port, ApiConfig::DEFAULT_PORT);
        assert!(!config.use_https);
        assert_eq!(config.timeout, ApiConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn base_url_http() {
        let config = ApiConfig::new("mqttpi.local");
        assert_eq!(config.base_url(), "http://mqttpi.local:5001");
    }

    #[test]
    fn base_url_https_custom_port() {
        let config = ApiConfig::new("meter.example").with_https().with_port(8443);
        assert_eq!(config.base_url(), "https://meter.example:8443");
    }

    #[test]
    fn accept_passes_success() {
        assert!(accept(Envelope {
            success: true,
            error: None
        })
        .is_ok());
    }

    #[test]
    fn accept_surfaces_server_error_message() {
        let err = accept(Envelope {
            success: false,
            error: Some("boom".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(message) if message == "boom"));
    }

    #[test]
    fn accept_handles_missing_error_message() {
        let err = accept(Envelope {
            success: false,
            error: None,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
    }
}
