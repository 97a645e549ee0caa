// Result payload for one place, built from raw hourly arrays
use super::aqi::breakdown;
use super::category::{aqi_category, Badge};
use super::error::AqiError;
use super::pollutant::{Pollutant, PollutantSample};
use super::series::{aggregate, DailyRow, HourlyRow, RawHourlyPayload, Series};
use super::visibility::{Redact, VisibilityPolicy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result payload for one place.
///
/// When redacted, `subindices` and `dominant` are filtered too: hidden
/// pollutants are dropped from `subindices`, `dominant` becomes `null` if it
/// names a hidden pollutant, and both are cleared when the AQI tile is hidden.
/// Consumers expecting all three sub-indices regardless of viewer will see
/// fewer keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiReport {
    pub place: String,
    pub aqi: u16,
    #[serde(flatten)]
    pub badge: Badge,
    pub dominant: Option<Pollutant>,
    pub subindices: BTreeMap<Pollutant, u16>,
    pub current: PollutantSample,
    pub series: Series,
    pub hourly: Vec<HourlyRow>,
    pub daily: Vec<DailyRow>,
    /// Whether `aqi` came from at least one measured pollutant.
    #[serde(skip)]
    pub data_available: bool,
}

/// Build the unredacted report. The last sample of each array is "current".
pub fn build_report(place: &str, payload: &RawHourlyPayload) -> Result<AqiReport, AqiError> {
    let aggregated = aggregate(payload)?;
    let current = payload.current();
    let now = breakdown(&current);

    Ok(AqiReport {
        place: place.to_string(),
        aqi: now.aqi,
        badge: aqi_category(now.aqi),
        dominant: now.dominant,
        subindices: now.subindices,
        current,
        series: Series::from_payload(payload),
        hourly: aggregated.hourly,
        daily: aggregated.daily,
        data_available: now.data_available,
    })
}

impl Redact for AqiReport {
    fn redact(&self, policy: &VisibilityPolicy) -> Self {
        let (aqi, badge) = if policy.show_aqi {
            (self.aqi, self.badge)
        } else {
            (0, Badge::HIDDEN)
        };

        // Sub-indices and the dominant key would otherwise reveal hidden
        // pollutants or the hidden tile.
        let subindices = if policy.show_aqi {
            self.subindices
                .iter()
                .filter(|(p, _)| policy.permits(**p))
                .map(|(p, idx)| (*p, *idx))
                .collect()
        } else {
            BTreeMap::new()
        };
        let dominant = self
            .dominant
            .filter(|p| policy.show_aqi && policy.permits(*p));

        Self {
            place: self.place.clone(),
            aqi,
            badge,
            dominant,
            subindices,
            current: self.current.redact(policy),
            series: self.series.redact(policy),
            hourly: self.hourly.redact(policy),
            daily: self.daily.redact(policy),
            data_available: self.data_available,
        }
    }
}
