// Nominatim geocoder adapter
use crate::application::air_quality_repository::Geocoder;
use crate::domain::location::Coordinates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    client: reqwest::Client,
}

// Nominatim serializes coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: String, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build geocoder HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_query_url(&self, address: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(address)
        )
    }

    fn first_coordinate(hits: &[SearchHit]) -> Option<Coordinates> {
        let hit = hits.first()?;
        let latitude = hit.lat.parse::<f64>().ok()?;
        let longitude = hit.lon.parse::<f64>().ok()?;
        Some(Coordinates::new(latitude, longitude))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let url = self.build_query_url(address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach the geocoder")?;

        if !response.status().is_success() {
            anyhow::bail!("Geocoder returned status {}", response.status());
        }

        let hits = response
            .json::<Vec<SearchHit>>()
            .await
            .context("Failed to parse geocoder response")?;

        Ok(Self::first_coordinate(&hits))
    }
}
