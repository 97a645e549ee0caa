// Hourly series aggregation into per-hour and per-day rows

use super::aqi::compute_us_aqi;
use super::error::AqiError;
use super::pollutant::{Pollutant, PollutantSample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw hourly arrays as received from the air-quality provider.
///
/// Pollutant arrays are parallel to `time`. A missing or short array reads as
/// null past its end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHourlyPayload {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    pub pm10: Vec<Option<f64>>,
    #[serde(default)]
    pub o3: Vec<Option<f64>>,
    #[serde(default)]
    pub co: Vec<Option<f64>>,
    #[serde(default)]
    pub no2: Vec<Option<f64>>,
    #[serde(default)]
    pub so2: Vec<Option<f64>>,
}

impl RawHourlyPayload {
    pub fn column(&self, pollutant: Pollutant) -> &[Option<f64>] {
        match pollutant {
            Pollutant::Pm25 => &self.pm2_5,
            Pollutant::Pm10 => &self.pm10,
            Pollutant::O3 => &self.o3,
            Pollutant::Co => &self.co,
            Pollutant::No2 => &self.no2,
            Pollutant::So2 => &self.so2,
        }
    }

    pub fn value_at(&self, pollutant: Pollutant, idx: usize) -> Option<f64> {
        self.column(pollutant).get(idx).copied().flatten()
    }

    pub fn sample_at(&self, idx: usize) -> PollutantSample {
        Pollutant::ALL
            .into_iter()
            .fold(PollutantSample::default(), |s, p| s.with(p, self.value_at(p, idx)))
    }

    /// The "current" sample: the last entry of each pollutant array.
    pub fn current(&self) -> PollutantSample {
        Pollutant::ALL.into_iter().fold(PollutantSample::default(), |s, p| {
            s.with(p, self.column(p).last().copied().flatten())
        })
    }
}

/// Full time-aligned series as handed to charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub time: Vec<String>,
    #[serde(flatten)]
    pub values: BTreeMap<Pollutant, Vec<Option<f64>>>,
}

impl Series {
    pub fn from_payload(payload: &RawHourlyPayload) -> Self {
        Self {
            time: payload.time.clone(),
            values: Pollutant::ALL
                .into_iter()
                .map(|p| (p, payload.column(p).to_vec()))
                .collect(),
        }
    }
}

/// One hour with its AQI-relevant concentrations and the AQI for that hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    pub time: String,
    pub aqi: u16,
    #[serde(flatten)]
    pub values: BTreeMap<Pollutant, Option<f64>>,
}

/// One UTC day: mean concentrations and the worst hourly AQI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub day: String,
    pub aqi: u16,
    #[serde(flatten)]
    pub values: BTreeMap<Pollutant, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub hourly: Vec<HourlyRow>,
    pub daily: Vec<DailyRow>,
}

/// `YYYY-MM-DD` prefix of an ISO timestamp.
pub fn day_of(time: &str) -> &str {
    time.get(..10).unwrap_or(time)
}

pub fn hourly_rows(payload: &RawHourlyPayload) -> Result<Vec<HourlyRow>, AqiError> {
    if payload.time.is_empty() {
        return Err(AqiError::NoData);
    }

    Ok(payload
        .time
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let sample = payload.sample_at(i).aqi_subset();
            HourlyRow {
                time: t.clone(),
                aqi: compute_us_aqi(&sample),
                values: Pollutant::AQI.into_iter().map(|p| (p, sample.get(p))).collect(),
            }
        })
        .collect())
}

#[derive(Default)]
struct DayBucket {
    values: BTreeMap<Pollutant, Vec<f64>>,
    aqi: Vec<u16>,
}

fn mean_rounded(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean * 100.0).round_ties_even() / 100.0)
}

/// Reduce hourly rows to one row per day, days ascending.
pub fn daily_rows(hourly: &[HourlyRow]) -> Vec<DailyRow> {
    let mut buckets: BTreeMap<&str, DayBucket> = BTreeMap::new();
    for row in hourly {
        let bucket = buckets.entry(day_of(&row.time)).or_default();
        for p in Pollutant::AQI {
            let slot = bucket.values.entry(p).or_default();
            if let Some(Some(v)) = row.values.get(&p) {
                slot.push(*v);
            }
        }
        bucket.aqi.push(row.aqi);
    }

    buckets
        .into_iter()
        .map(|(day, bucket)| DailyRow {
            day: day.to_string(),
            aqi: bucket.aqi.iter().copied().max().unwrap_or(0),
            values: Pollutant::AQI
                .into_iter()
                .map(|p| (p, bucket.values.get(&p).and_then(|v| mean_rounded(v))))
                .collect(),
        })
        .collect()
}

pub fn aggregate(payload: &RawHourlyPayload) -> Result<AggregatedSeries, AqiError> {
    let hourly = hourly_rows(payload)?;
    let daily = daily_rows(&hourly);
    Ok(AggregatedSeries { hourly, daily })
}
