// Open-Meteo geocoding and air-quality client
use crate::application::air_quality_provider::AirQualityProvider;
use crate::domain::error::AqiError;
use crate::domain::measurement::Place;
use crate::domain::series::RawHourlyPayload;
use crate::infrastructure::config::OpenMeteoSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const HOURLY_FIELDS: &str =
    "pm2_5,pm10,ozone,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    settings: OpenMeteoSettings,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    pm10: Vec<Option<f64>>,
    #[serde(default)]
    ozone: Vec<Option<f64>>,
    #[serde(default)]
    carbon_monoxide: Vec<Option<f64>>,
    #[serde(default)]
    nitrogen_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    sulphur_dioxide: Vec<Option<f64>>,
}

impl From<HourlyBlock> for RawHourlyPayload {
    fn from(block: HourlyBlock) -> Self {
        Self {
            time: block.time,
            pm2_5: block.pm2_5,
            pm10: block.pm10,
            o3: block.ozone,
            co: block.carbon_monoxide,
            no2: block.nitrogen_dioxide,
            so2: block.sulphur_dioxide,
        }
    }
}

impl OpenMeteoClient {
    pub fn new(settings: OpenMeteoSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn build_geocode_url(&self, query: &str) -> String {
        format!(
            "{}?name={}&count=1",
            self.settings.geocode_url,
            urlencoding::encode(query)
        )
    }

    fn build_air_quality_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}?latitude={}&longitude={}&hourly={}&timezone=UTC&past_days={}&forecast_days={}",
            self.settings.air_quality_url,
            lat,
            lon,
            HOURLY_FIELDS,
            self.settings.past_days,
            self.settings.forecast_days
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, timeout_secs: u64) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(timeout_secs))
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Open-Meteo request failed with status {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse Open-Meteo response")
    }
}

fn first_place(query: &str, response: GeocodeResponse) -> Result<Place, AqiError> {
    let hit = response
        .results
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AqiError::PlaceNotFound(query.to_string()))?;

    let name = Place::display_name(&[
        hit.name.as_deref(),
        hit.admin1.as_deref(),
        hit.country_code.as_deref(),
    ]);
    Ok(Place {
        lat: hit.latitude,
        lon: hit.longitude,
        name,
    })
}

#[async_trait]
impl AirQualityProvider for OpenMeteoClient {
    async fn geocode(&self, query: &str) -> Result<Place> {
        let url = self.build_geocode_url(query);
        tracing::debug!("Geocoding {}", query);
        let response: GeocodeResponse = self
            .get_json(&url, self.settings.geocode_timeout_secs)
            .await?;
        Ok(first_place(query, response)?)
    }

    async fn fetch_hourly(&self, lat: f64, lon: f64) -> Result<RawHourlyPayload> {
        let url = self.build_air_quality_url(lat, lon);
        tracing::debug!("Fetching air quality for ({}, {})", lat, lon);
        let response: AirQualityResponse = self
            .get_json(&url, self.settings.air_quality_timeout_secs)
            .await?;
        Ok(response.hourly.unwrap_or_default().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenMeteoClient {
        OpenMeteoClient::new(OpenMeteoSettings::default())
    }

    #[test]
    fn test_geocode_url_is_encoded() {
        let url = client().build_geocode_url("São Paulo");
        assert_eq!(
            url,
            "https://geocoding-api.open-meteo.com/v1/search?name=S%C3%A3o%20Paulo&count=1"
        );
    }

    #[test]
    fn test_air_quality_url() {
        let url = client().build_air_quality_url(52.52, 13.41);
        assert!(url.starts_with("https://air-quality-api.open-meteo.com/v1/air-quality?"));
        assert!(url.contains("latitude=52.52&longitude=13.41"));
        assert!(url.contains("hourly=pm2_5,pm10,ozone,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide"));
        assert!(url.contains("timezone=UTC&past_days=6&forecast_days=1"));
    }

    #[test]
    fn test_first_place() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{"results":[{"name":"Springfield","latitude":39.8,"longitude":-89.6,
                "admin1":"Illinois","country_code":"US"}]}"#,
        )
        .unwrap();
        let place = first_place("springfield", response).unwrap();
        assert_eq!(place.name, "Springfield, Illinois, US");
        assert_eq!(place.lat, 39.8);
    }

    #[test]
    fn test_no_geocode_results() {
        let response: GeocodeResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert_eq!(
            first_place("Atlantis", response),
            Err(AqiError::PlaceNotFound("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_hourly_block_maps_upstream_names() {
        let response: AirQualityResponse = serde_json::from_str(
            r#"{"hourly":{"time":["2024-05-01T00:00"],"pm2_5":[3.1],"ozone":[null],
                "carbon_monoxide":[180.0]}}"#,
        )
        .unwrap();
        let payload: RawHourlyPayload = response.hourly.unwrap_or_default().into();
        assert_eq!(payload.time.len(), 1);
        assert_eq!(payload.pm2_5, vec![Some(3.1)]);
        assert_eq!(payload.o3, vec![None]);
        assert_eq!(payload.co, vec![Some(180.0)]);
        assert!(payload.pm10.is_empty());
    }
}
