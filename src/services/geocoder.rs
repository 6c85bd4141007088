//! Address geocoding adapter.
//!
//! Geocoding is best-effort enrichment: a failed lookup must never abort
//! the crawl, so `locate` swallows every failure and reports a zero
//! coordinate pair instead.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::GeocoderConfig;

/// Maps a free-text address to a (latitude, longitude) pair.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up an address. Returns `(0.0, 0.0)` on any failure.
    async fn locate(&self, address: &str) -> (f64, f64);
}

/// Geocoder backed by the Google Geocoding JSON API.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Create a geocoder using the given client and API key.
    pub fn new(client: reqwest::Client, config: &GeocoderConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        }
    }

    async fn request(&self, address: &str) -> crate::error::Result<String> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn locate(&self, address: &str) -> (f64, f64) {
        match self.request(address).await {
            Ok(body) => decode_coords(&body).unwrap_or_else(|| {
                log::warn!("Geocoder returned no result for address: {address}");
                (0.0, 0.0)
            }),
            Err(e) => {
                log::warn!("Geocoding failed for address '{address}': {e}");
                (0.0, 0.0)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Decode the first result's coordinates out of a geocoding response body.
fn decode_coords(body: &str) -> Option<(f64, f64)> {
    let response: GeocodeResponse = serde_json::from_str(body).ok()?;
    let location = &response.results.first()?.geometry.location;
    Some((location.lat, location.lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_coords_reads_first_result() {
        let body = r#"{
            "results": [
                {"geometry": {"location": {"lat": 40.7128, "lng": -74.006}}},
                {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
            ],
            "status": "OK"
        }"#;
        assert_eq!(decode_coords(body), Some((40.7128, -74.006)));
    }

    #[test]
    fn decode_coords_empty_results() {
        let body = r#"{"results": [], "status": "ZERO_RESULTS"}"#;
        assert_eq!(decode_coords(body), None);
    }

    #[test]
    fn decode_coords_malformed_body() {
        assert_eq!(decode_coords("not json"), None);
        assert_eq!(decode_coords(r#"{"status": "OK"}"#), None);
    }
}
