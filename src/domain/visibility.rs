// Per-viewer field redaction

use super::pollutant::{Pollutant, PollutantSample};
use super::series::{DailyRow, HourlyRow, Series};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// What a viewer may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    pub permitted: BTreeSet<Pollutant>,
    pub show_aqi: bool,
}

impl VisibilityPolicy {
    pub fn permits(&self, pollutant: Pollutant) -> bool {
        self.permitted.contains(&pollutant)
    }
}

fn visible() -> bool {
    true
}

/// Stored per-viewer switches, one per pollutant plus the AQI tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VisibilityFlags {
    #[serde(default = "visible")]
    pub pm2_5: bool,
    #[serde(default = "visible")]
    pub pm10: bool,
    #[serde(default = "visible")]
    pub o3: bool,
    #[serde(default = "visible")]
    pub co: bool,
    #[serde(default = "visible")]
    pub no2: bool,
    #[serde(default = "visible")]
    pub so2: bool,
    #[serde(default = "visible")]
    pub aqi: bool,
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self {
            pm2_5: true,
            pm10: true,
            o3: true,
            co: true,
            no2: true,
            so2: true,
            aqi: true,
        }
    }
}

impl VisibilityFlags {
    fn allows(&self, pollutant: Pollutant) -> bool {
        match pollutant {
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::Co => self.co,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
        }
    }
}

impl From<VisibilityFlags> for VisibilityPolicy {
    fn from(flags: VisibilityFlags) -> Self {
        Self {
            permitted: Pollutant::ALL
                .into_iter()
                .filter(|p| flags.allows(*p))
                .collect(),
            show_aqi: flags.aqi,
        }
    }
}

/// An output shape that can be redacted for a viewer.
///
/// Hidden pollutants are removed with a strategy that depends on the shape:
///
/// * scalar tiles and stored measurements keep the key and show `null`
/// * the chart series keeps the key with an empty array
/// * hourly and daily rows drop the key entirely
///
/// Implementations must be idempotent: redacting twice with the same policy
/// equals redacting once.
pub trait Redact: Sized {
    fn redact(&self, policy: &VisibilityPolicy) -> Self;
}

/// Apply an optional policy; a viewer with no policy sees everything.
pub fn redact_for<T: Redact + Clone>(value: &T, policy: Option<&VisibilityPolicy>) -> T {
    match policy {
        Some(policy) => value.redact(policy),
        None => value.clone(),
    }
}

fn omit_hidden(
    values: &BTreeMap<Pollutant, Option<f64>>,
    policy: &VisibilityPolicy,
) -> BTreeMap<Pollutant, Option<f64>> {
    values
        .iter()
        .filter(|(p, _)| policy.permits(**p))
        .map(|(p, v)| (*p, *v))
        .collect()
}

impl Redact for PollutantSample {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        Pollutant::ALL.into_iter().fold(*self, |sample, p| {
            if policy.permits(p) {
                sample
            } else {
                sample.with(p, None)
            }
        })
    }
}

impl Redact for Series {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        Self {
            time: self.time.clone(),
            values: Pollutant::ALL
                .into_iter()
                .map(|p| {
                    let column = match self.values.get(&p) {
                        Some(column) if policy.permits(p) => column.clone(),
                        _ => Vec::new(),
                    };
                    (p, column)
                })
                .collect(),
        }
    }
}

impl Redact for HourlyRow {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        Self {
            time: self.time.clone(),
            aqi: self.aqi,
            values: omit_hidden(&self.values, policy),
        }
    }
}

impl Redact for DailyRow {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        Self {
            day: self.day.clone(),
            aqi: self.aqi,
            values: omit_hidden(&self.values, policy),
        }
    }
}

impl<T: Redact> Redact for Vec<T> {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        self.iter().map(|item| item.redact(policy)).collect()
    }
}
