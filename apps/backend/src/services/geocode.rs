//! Reverse geocoding for emergency reports.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

const LOCATIONIQ_REVERSE_URL: &str = "https://us1.locationiq.com/v1/reverse";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Coordinates rendered the way they are stored when no address is available.
pub fn coordinates_label(lat: f64, lon: f64) -> String {
    format!("{lat:.6}, {lon:.6}")
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<String, GeocodeError>;
}

/// Used when no API key is configured: echoes the coordinates back.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGeocoder;

#[async_trait]
impl Geocoder for NoopGeocoder {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<String, GeocodeError> {
        Ok(coordinates_label(lat, lon))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    #[serde(default)]
    road: String,
    #[serde(default)]
    village: String,
    #[serde(default)]
    county: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    postcode: String,
    #[serde(default)]
    country: String,
}

impl ReverseResponse {
    /// "road, village, county, state postcode, country" with blanks skipped,
    /// falling back to `display_name`.
    fn label(self) -> String {
        let a = &self.address;
        let mut out = String::new();
        for part in [&a.road, &a.village, &a.county] {
            if !part.is_empty() {
                out.push_str(part);
                out.push_str(", ");
            }
        }
        if !a.state.is_empty() {
            out.push_str(&a.state);
            out.push(' ');
        }
        if !a.postcode.is_empty() {
            out.push_str(&a.postcode);
            out.push_str(", ");
        }
        out.push_str(&a.country);

        if out.is_empty() {
            self.display_name
        } else {
            out
        }
    }
}

pub struct LocationIqGeocoder {
    client: reqwest::Client,
    api_key: String,
}

impl LocationIqGeocoder {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for LocationIqGeocoder {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<String, GeocodeError> {
        let lat_s = format!("{lat:.6}");
        let lon_s = format!("{lon:.6}");
        let resp = self
            .client
            .get(LOCATIONIQ_REVERSE_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("lat", lat_s.as_str()),
                ("lon", lon_s.as_str()),
                ("format", "json"),
                ("normalizeaddress", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "reverse geocoding failed");
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ReverseResponse = resp.json().await?;
        Ok(parsed.label())
    }
}
