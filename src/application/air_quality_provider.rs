// Upstream data source for geocoding and hourly pollutant arrays
use crate::domain::measurement::Place;
use crate::domain::series::RawHourlyPayload;
use async_trait::async_trait;

#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    /// Resolve a free-form place name or ZIP code to coordinates
    async fn geocode(&self, query: &str) -> anyhow::Result<Place>;

    /// Fetch hourly pollutant arrays (UTC) around now
    async fn fetch_hourly(&self, lat: f64, lon: f64) -> anyhow::Result<RawHourlyPayload>;
}
