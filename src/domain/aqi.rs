// Multi-pollutant AQI aggregation
use super::breakpoints::{ozone_table_ppm, sub_index};
use super::pollutant::{Pollutant, PollutantSample};
use serde::Serialize;
use std::collections::BTreeMap;

/// Overall AQI for one sample together with how it was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AqiBreakdown {
    pub aqi: u16,
    pub subindices: BTreeMap<Pollutant, u16>,
    pub dominant: Option<Pollutant>,
    /// False when no pollutant produced a sub-index, in which case `aqi` is 0
    /// but does not mean clean air.
    #[serde(skip)]
    pub data_available: bool,
}

/// Sub-index for a raw upstream concentration. Ozone arrives in µg/m³ and is
/// converted to ppm and saturated at the table top before lookup.
pub fn concentration_sub_index(pollutant: Pollutant, raw: f64) -> Option<u16> {
    match pollutant {
        Pollutant::O3 => sub_index(pollutant, ozone_table_ppm(raw)),
        _ => sub_index(pollutant, raw),
    }
}

/// Sub-indices for the AQI pollutants present in the sample. Pollutants
/// outside every segment are left out.
pub fn pollutant_subindices(sample: &PollutantSample) -> BTreeMap<Pollutant, u16> {
    Pollutant::AQI
        .into_iter()
        .filter_map(|p| {
            let raw = sample.get(p)?;
            concentration_sub_index(p, raw).map(|idx| (p, idx))
        })
        .collect()
}

/// The pollutant with the highest sub-index. Ties go to the first one in
/// `Pollutant::AQI` order.
pub fn dominant_pollutant(subindices: &BTreeMap<Pollutant, u16>) -> Option<Pollutant> {
    let mut best: Option<(Pollutant, u16)> = None;
    for p in Pollutant::AQI {
        if let Some(&idx) = subindices.get(&p) {
            match best {
                Some((_, top)) if idx <= top => {}
                _ => best = Some((p, idx)),
            }
        }
    }
    best.map(|(p, _)| p)
}

pub fn breakdown(sample: &PollutantSample) -> AqiBreakdown {
    let subindices = pollutant_subindices(sample);
    let dominant = dominant_pollutant(&subindices);
    let aqi = subindices.values().copied().max().unwrap_or(0);
    AqiBreakdown {
        aqi,
        data_available: !subindices.is_empty(),
        subindices,
        dominant,
    }
}

/// Overall US AQI: the maximum sub-index, or 0 when nothing could be computed.
pub fn compute_us_aqi(sample: &PollutantSample) -> u16 {
    breakdown(sample).aqi
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pm25(v: f64) -> PollutantSample {
        PollutantSample::default().with(Pollutant::Pm25, Some(v))
    }

    #[test]
    fn test_segment_boundary() {
        assert_eq!(compute_us_aqi(&pm25(12.0)), 50);
        assert_eq!(compute_us_aqi(&pm25(12.1)), 51);
    }

    #[test]
    fn test_empty_sample_is_zero_without_data() {
        let b = breakdown(&PollutantSample::default());
        assert_eq!(b.aqi, 0);
        assert!(!b.data_available);
        assert!(b.subindices.is_empty());
        assert_eq!(b.dominant, None);
    }

    #[test]
    fn test_measured_zero_has_data() {
        let b = breakdown(&pm25(0.0));
        assert_eq!(b.aqi, 0);
        assert!(b.data_available);
    }

    #[test]
    fn test_max_of_subindices() {
        let sample = pm25(10.0).with(Pollutant::Pm10, Some(200.0));
        let b = breakdown(&sample);
        assert_eq!(b.subindices[&Pollutant::Pm25], 42);
        assert_eq!(b.subindices[&Pollutant::Pm10], 123);
        assert_eq!(b.aqi, 123);
        assert_eq!(b.dominant, Some(Pollutant::Pm10));
    }

    #[test]
    fn test_gases_never_contribute() {
        let sample = PollutantSample::default()
            .with(Pollutant::Co, Some(10_000.0))
            .with(Pollutant::No2, Some(500.0))
            .with(Pollutant::So2, Some(500.0));
        assert_eq!(compute_us_aqi(&sample), 0);
        assert!(pollutant_subindices(&sample).is_empty());
    }

    #[test]
    fn test_out_of_range_pollutant_is_ignored() {
        let sample = pm25(12.05).with(Pollutant::Pm10, Some(20.0));
        let b = breakdown(&sample);
        assert!(!b.subindices.contains_key(&Pollutant::Pm25));
        assert_eq!(b.aqi, 19);
    }

    #[test]
    fn test_ozone_saturates_at_table_top() {
        let top = concentration_sub_index(Pollutant::O3, 400.0);
        assert_eq!(top, Some(300));
        assert_eq!(concentration_sub_index(Pollutant::O3, 2_000.0), top);
        assert_eq!(
            compute_us_aqi(&PollutantSample::default().with(Pollutant::O3, Some(10_000.0))),
            300
        );
    }

    #[test]
    fn test_ozone_converted_before_lookup() {
        // 100 µg/m³ is about 0.0509 ppm.
        assert_eq!(concentration_sub_index(Pollutant::O3, 100.0), Some(47));
    }

    #[test]
    fn test_dominant_tie_prefers_first() {
        let mut subs = BTreeMap::new();
        subs.insert(Pollutant::Pm10, 80);
        subs.insert(Pollutant::Pm25, 80);
        assert_eq!(dominant_pollutant(&subs), Some(Pollutant::Pm25));

        subs.insert(Pollutant::O3, 80);
        assert_eq!(dominant_pollutant(&subs), Some(Pollutant::Pm25));

        subs.remove(&Pollutant::Pm25);
        assert_eq!(dominant_pollutant(&subs), Some(Pollutant::Pm10));
    }

    #[test]
    fn test_dominant_tie_from_concentrations() {
        let sample = pm25(25.9).with(Pollutant::Pm10, Some(113.6));
        let b = breakdown(&sample);
        assert_eq!(b.subindices[&Pollutant::Pm25], 80);
        assert_eq!(b.subindices[&Pollutant::Pm10], 80);
        assert_eq!(b.dominant, Some(Pollutant::Pm25));
    }
}
