use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{Address, ReverseGeocoder};
use crate::config::GeocoderConfig;
use crate::exif::GeoCoordinate;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

/// Reverse geocoder backed by the OSM Nominatim HTTP API.
pub struct NominatimGeocoder {
    endpoint: String,
    client: Client,
}

impl NominatimGeocoder {
    /// Build a client with the configured timeout and User-Agent.
    ///
    /// The Nominatim usage policy requires an identifying User-Agent on
    /// every request.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "Nominatim"
    }

    async fn reverse(
        &self,
        coordinate: GeoCoordinate,
        language: &str,
    ) -> Result<Option<Address>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("accept-language", language.to_string()),
            ])
            .send()
            .await
            .context("Nominatim request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("Failed to read Nominatim response")?;

        if !status.is_success() {
            anyhow::bail!("Nominatim API error ({}): {}", status, text);
        }

        let parsed: ReverseResponse =
            serde_json::from_str(&text).context("Failed to parse Nominatim response JSON")?;

        Ok(parsed.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_address_deserializes() {
        let body = r#"{
            "display_name": "Èze, Nice, Alpes-Maritimes, France",
            "address": {
                "village": "Èze",
                "county": "Alpes-Maritimes",
                "country": "France",
                "postcode": "06360"
            }
        }"#;
        let parsed: ReverseResponse = serde_json::from_str(body).unwrap();
        let address = parsed.address.unwrap();
        assert_eq!(address.place(), Some("Èze"));
        assert!(address.city.is_none());
    }

    #[test]
    fn response_without_address_deserializes() {
        let body = r#"{"error": "Unable to geocode"}"#;
        let parsed: ReverseResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.address.is_none());
    }
}
