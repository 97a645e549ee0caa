// AQI service - Use case for looking up a place's air quality for a viewer
use crate::application::air_quality_provider::AirQualityProvider;
use crate::application::measurement_repository::MeasurementRepository;
use crate::application::visibility_repository::VisibilityRepository;
use crate::domain::measurement::{measurements_from_payload, Measurement};
use crate::domain::report::{build_report, AqiReport};
use crate::domain::visibility::{redact_for, VisibilityPolicy};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AqiService {
    provider: Arc<dyn AirQualityProvider>,
    repository: Arc<dyn MeasurementRepository>,
    visibility: Arc<dyn VisibilityRepository>,
}

impl AqiService {
    pub fn new(
        provider: Arc<dyn AirQualityProvider>,
        repository: Arc<dyn MeasurementRepository>,
        visibility: Arc<dyn VisibilityRepository>,
    ) -> Self {
        Self {
            provider,
            repository,
            visibility,
        }
    }

    /// Geocode, fetch, compute, persist, then redact for the viewer.
    /// Anonymous viewers and viewers without settings see everything.
    pub async fn lookup(&self, query: &str, viewer: Option<&str>) -> anyhow::Result<AqiReport> {
        let query = query.trim();
        anyhow::ensure!(!query.is_empty(), "query must not be empty");

        let place = self.provider.geocode(query).await?;
        let location = self
            .repository
            .get_or_create_location(query, &place)
            .await
            .context("Failed to resolve location")?;

        let payload = self.provider.fetch_hourly(place.lat, place.lon).await?;
        tracing::debug!(
            "Fetched {} hourly samples for {}",
            payload.time.len(),
            location.name
        );

        let report = build_report(&place.name, &payload)?;
        if !report.data_available {
            tracing::warn!(
                "No AQI pollutant in the latest sample for {}; reporting 0",
                location.name
            );
        }

        let measurements = measurements_from_payload(location.id, &payload)?;
        let written = self
            .repository
            .upsert_measurements(&measurements)
            .await
            .context("Failed to store measurements")?;
        tracing::debug!("Stored {} measurements for location {}", written, location.id);

        let policy = self.policy_for(viewer).await?;

        tracing::info!(
            "AQI for {}: {} ({}), dominant {}, policy applied: {}",
            place.name,
            report.aqi,
            report.badge.label,
            report.dominant.map(|p| p.key()).unwrap_or("none"),
            policy.is_some()
        );

        Ok(redact_for(&report, policy.as_ref()))
    }

    /// Stored measurements for a location, redacted for the viewer like `lookup`.
    pub async fn measurements(
        &self,
        location_id: u64,
        viewer: Option<&str>,
    ) -> anyhow::Result<Vec<Measurement>> {
        let rows = self.repository.measurements_for(location_id).await?;
        let policy = self.policy_for(viewer).await?;
        Ok(redact_for(&rows, policy.as_ref()))
    }

    async fn policy_for(&self, viewer: Option<&str>) -> anyhow::Result<Option<VisibilityPolicy>> {
        match viewer {
            Some(id) => self.visibility.policy_for(id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Badge;
    use crate::domain::error::AqiError;
    use crate::domain::measurement::Place;
    use crate::domain::pollutant::Pollutant;
    use crate::domain::series::RawHourlyPayload;
    use crate::domain::visibility::VisibilityFlags;
    use crate::infrastructure::memory_repository::InMemoryMeasurementRepository;
    use crate::infrastructure::visibility_store::ConfigVisibilityRepository;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeProvider {
        payload: RawHourlyPayload,
    }

    #[async_trait]
    impl AirQualityProvider for FakeProvider {
        async fn geocode(&self, query: &str) -> anyhow::Result<Place> {
            if query == "Atlantis" {
                return Err(AqiError::PlaceNotFound(query.to_string()).into());
            }
            Ok(Place {
                lat: 39.8,
                lon: -89.6,
                name: "Springfield, Illinois, US".to_string(),
            })
        }

        async fn fetch_hourly(&self, _lat: f64, _lon: f64) -> anyhow::Result<RawHourlyPayload> {
            Ok(self.payload.clone())
        }
    }

    fn payload() -> RawHourlyPayload {
        RawHourlyPayload {
            time: vec!["2024-05-01T00:00".to_string(), "2024-05-01T01:00".to_string()],
            pm2_5: vec![Some(12.0), Some(40.0)],
            pm10: vec![Some(20.0), Some(30.0)],
            co: vec![Some(200.0), Some(210.0)],
            ..Default::default()
        }
    }

    fn service(payload: RawHourlyPayload) -> (AqiService, Arc<InMemoryMeasurementRepository>) {
        let repository = Arc::new(InMemoryMeasurementRepository::new());
        let mut viewers = HashMap::new();
        viewers.insert(
            "guest".to_string(),
            VisibilityFlags {
                pm2_5: false,
                co: false,
                aqi: false,
                ..VisibilityFlags::default()
            },
        );
        let service = AqiService::new(
            Arc::new(FakeProvider { payload }),
            repository.clone(),
            Arc::new(ConfigVisibilityRepository::new(viewers)),
        );
        (service, repository)
    }

    #[tokio::test]
    async fn test_lookup_unfiltered() {
        let (service, _) = service(payload());
        let report = service.lookup("  Springfield ", None).await.unwrap();
        assert_eq!(report.place, "Springfield, Illinois, US");
        assert_eq!(report.aqi, 112);
        assert_eq!(report.dominant, Some(Pollutant::Pm25));
        assert_eq!(report.current.co, Some(210.0));
    }

    #[tokio::test]
    async fn test_lookup_applies_viewer_policy() {
        let (service, _) = service(payload());
        let report = service.lookup("Springfield", Some("guest")).await.unwrap();
        assert_eq!(report.aqi, 0);
        assert_eq!(report.badge, Badge::HIDDEN);
        assert_eq!(report.current.pm2_5, None);
        assert_eq!(report.current.co, None);
        assert_eq!(report.current.pm10, Some(30.0));
        assert!(report.series.values[&Pollutant::Pm25].is_empty());
        assert!(!report.hourly[0].values.contains_key(&Pollutant::Pm25));
    }

    #[tokio::test]
    async fn test_unknown_viewer_sees_everything() {
        let (service, _) = service(payload());
        let report = service.lookup("Springfield", Some("stranger")).await.unwrap();
        assert_eq!(report.aqi, 112);
        assert_eq!(report.current.pm2_5, Some(40.0));
    }

    #[tokio::test]
    async fn test_lookup_persists_each_hour() {
        let (service, repository) = service(payload());
        service.lookup("Springfield", Some("guest")).await.unwrap();
        service.lookup("Springfield", None).await.unwrap();

        let stored = repository.measurements_for(1).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].aqi_us, 50);
        assert_eq!(stored[1].aqi_us, 112);
        assert_eq!(stored[1].pm2_5, Some(40.0));
    }

    #[tokio::test]
    async fn test_measurements_are_redacted_for_viewer() {
        let (service, _) = service(payload());
        service.lookup("Springfield", None).await.unwrap();

        let hidden = service.measurements(1, Some("guest")).await.unwrap();
        assert_eq!(hidden.len(), 2);
        assert!(hidden.iter().all(|m| m.pm2_5.is_none() && m.co.is_none()));
        assert!(hidden.iter().all(|m| m.aqi_us == 0));
        assert_eq!(hidden[1].pm10, Some(30.0));

        let open = service.measurements(1, None).await.unwrap();
        assert_eq!(open[1].pm2_5, Some(40.0));
        assert_eq!(open[1].aqi_us, 112);
    }

    #[tokio::test]
    async fn test_lookup_without_timestamps() {
        let (service, repository) = service(RawHourlyPayload::default());
        let err = service.lookup("Springfield", None).await.unwrap_err();
        assert_eq!(err.downcast_ref::<AqiError>(), Some(&AqiError::NoData));
        assert!(repository.measurements_for(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_unknown_place() {
        let (service, _) = service(payload());
        let err = service.lookup("Atlantis", None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AqiError>(),
            Some(AqiError::PlaceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_rejects_blank_query() {
        let (service, _) = service(payload());
        assert!(service.lookup("   ", None).await.is_err());
    }
}
