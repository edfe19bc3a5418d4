//! Blocking REST client for the tracker vendor.
//!
//! Endpoints (relative to the configured API URL, HTTP basic auth):
//! - `GET /api/v1/devices/?kind=<kind>`
//! - `GET /api/v1/trackers/<id>/data/?max_count=<n>`

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use super::{Device, DeviceStatus, PositionFix, TrackerIcon, TrackerProvider};
use crate::config::TrackerConfig;
use crate::error::FetchError;

#[derive(Debug, serde::Deserialize)]
struct DeviceRecord {
    id: u64,
    #[serde(default)]
    name: String,
    tracker_status: StatusRecord,
    tracker_config: IconRecord,
}

#[derive(Debug, serde::Deserialize)]
struct StatusRecord {
    battery: u8,
}

#[derive(Debug, serde::Deserialize)]
struct IconRecord {
    icon: TrackerIcon,
}

impl TryFrom<DeviceRecord> for Device {
    type Error = FetchError;

    fn try_from(record: DeviceRecord) -> Result<Self, Self::Error> {
        if record.tracker_status.battery > 100 {
            return Err(FetchError::Decode(format!(
                "battery {}% for device {}",
                record.tracker_status.battery, record.id
            )));
        }
        Ok(Device {
            id: record.id.to_string(),
            name: record.name,
            status: DeviceStatus {
                battery: record.tracker_status.battery,
                icon: record.tracker_config.icon,
            },
        })
    }
}

/// [`TrackerProvider`] over the vendor's HTTP API
pub struct HttpProvider {
    client: Client,
    api_url: String,
    username: String,
    password: String,
}

impl HttpProvider {
    pub fn new(config: &TrackerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from(config.timeout))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError> {
        let url = format!("{}{}", self.api_url, path);
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .query(query)
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Self::decode(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            return Err(FetchError::Http(format!("{} from {}", status, response.url())));
        }
        let body = response.text().map_err(|e| FetchError::Http(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(format!("{}: {}", e, body)))
    }
}

impl TrackerProvider for HttpProvider {
    fn devices(&self, kind: &str) -> Result<Vec<Device>, FetchError> {
        let records: Vec<DeviceRecord> = self.get("/api/v1/devices/", &[("kind", kind.to_string())])?;
        records.into_iter().map(Device::try_from).collect()
    }

    fn locations(&self, device: &Device, max_count: usize) -> Result<Vec<PositionFix>, FetchError> {
        self.get(
            &format!("/api/v1/trackers/{}/data/", device.id),
            &[("max_count", max_count.to_string())],
        )
    }
}
