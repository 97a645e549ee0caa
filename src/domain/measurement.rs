// Persisted location and per-hour measurement records
use super::aqi::compute_us_aqi;
use super::error::AqiError;
use super::pollutant::Pollutant;
use super::series::RawHourlyPayload;
use super::visibility::{Redact, VisibilityPolicy};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// A geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl Place {
    /// Display name from the non-empty geocoder parts, e.g. "Springfield, Illinois, US".
    pub fn display_name(parts: &[Option<&str>]) -> String {
        parts
            .iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: u64,
    pub query: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// One stored hour. Keyed on `(location_id, ts)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub location_id: u64,
    pub ts: DateTime<Utc>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub aqi_us: u16,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse an upstream timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AqiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AqiError::InvalidTimestamp(raw.to_string()))
}

/// One record per timestamp, each with the AQI of its own hour.
pub fn measurements_from_payload(
    location_id: u64,
    payload: &RawHourlyPayload,
) -> Result<Vec<Measurement>, AqiError> {
    payload
        .time
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let sample = payload.sample_at(i);
            Ok(Measurement {
                location_id,
                ts: parse_timestamp(t)?,
                pm2_5: sample.get(Pollutant::Pm25),
                pm10: sample.get(Pollutant::Pm10),
                o3: sample.get(Pollutant::O3),
                co: sample.get(Pollutant::Co),
                no2: sample.get(Pollutant::No2),
                so2: sample.get(Pollutant::So2),
                aqi_us: compute_us_aqi(&sample.aqi_subset()),
            })
        })
        .collect()
}

impl Redact for Measurement {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        let keep = |p: Pollutant, v: Option<f64>| v.filter(|_| policy.permits(p));
        Self {
            location_id: self.location_id,
            ts: self.ts,
            pm2_5: keep(Pollutant::Pm25, self.pm2_5),
            pm10: keep(Pollutant::Pm10, self.pm10),
            o3: keep(Pollutant::O3, self.o3),
            co: keep(Pollutant::Co, self.co),
            no2: keep(Pollutant::No2, self.no2),
            so2: keep(Pollutant::So2, self.so2),
            aqi_us: if policy.show_aqi { self.aqi_us } else { 0 },
        }
    }
}
