// Repository trait for locations and hourly measurements
use crate::domain::measurement::{Location, Measurement, Place};
use async_trait::async_trait;

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Find the location for (trimmed query, lat, lon) or create it with the place name
    async fn get_or_create_location(&self, query: &str, place: &Place) -> anyhow::Result<Location>;

    /// Insert or replace measurements keyed on (location_id, ts); returns rows written
    async fn upsert_measurements(&self, measurements: &[Measurement]) -> anyhow::Result<usize>;

    /// All measurements for a location ordered by timestamp
    async fn measurements_for(&self, location_id: u64) -> anyhow::Result<Vec<Measurement>>;
}
