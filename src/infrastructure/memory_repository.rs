// In-memory measurement store
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::measurement::{Location, Measurement, Place};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Store {
    locations: Vec<Location>,
    measurements: BTreeMap<(u64, DateTime<Utc>), Measurement>,
}

#[derive(Debug, Default)]
pub struct InMemoryMeasurementRepository {
    store: RwLock<Store>,
}

impl InMemoryMeasurementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MeasurementRepository for InMemoryMeasurementRepository {
    async fn get_or_create_location(&self, query: &str, place: &Place) -> Result<Location> {
        let query = query.trim();
        let mut store = self.store.write().await;

        if let Some(existing) = store
            .locations
            .iter()
            .find(|l| l.query == query && l.lat == place.lat && l.lon == place.lon)
        {
            return Ok(existing.clone());
        }

        let location = Location {
            id: store.locations.len() as u64 + 1,
            query: query.to_string(),
            name: place.name.clone(),
            lat: place.lat,
            lon: place.lon,
        };
        tracing::info!("Created location {} ({})", location.id, location.name);
        store.locations.push(location.clone());
        Ok(location)
    }

    async fn upsert_measurements(&self, measurements: &[Measurement]) -> Result<usize> {
        let mut store = self.store.write().await;
        for m in measurements {
            store
                .measurements
                .insert((m.location_id, m.ts), m.clone());
        }
        Ok(measurements.len())
    }

    async fn measurements_for(&self, location_id: u64) -> Result<Vec<Measurement>> {
        let store = self.store.read().await;
        Ok(store
            .measurements
            .range((location_id, DateTime::<Utc>::MIN_UTC)..=(location_id, DateTime::<Utc>::MAX_UTC))
            .map(|(_, m)| m.clone())
            .collect())
    }
}
