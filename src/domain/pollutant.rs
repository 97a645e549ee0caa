// Pollutant keys and per-timestamp samples
use serde::{Deserialize, Serialize};

/// Pollutants reported by the upstream provider, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "pm2_5")]
    Pm25,
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "o3")]
    O3,
    #[serde(rename = "co")]
    Co,
    #[serde(rename = "no2")]
    No2,
    #[serde(rename = "so2")]
    So2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::Co,
        Pollutant::No2,
        Pollutant::So2,
    ];

    /// Pollutants that contribute to the US AQI. Order is the dominance tie-break order.
    pub const AQI: [Pollutant; 3] = [Pollutant::Pm25, Pollutant::Pm10, Pollutant::O3];

    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::Co => "co",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
        }
    }
}

/// Concentrations observed at one timestamp. `None` means not measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantSample {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
}

impl PollutantSample {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::Co => self.co,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
        }
    }

    /// Returns a copy with one pollutant replaced.
    pub fn with(mut self, pollutant: Pollutant, value: Option<f64>) -> Self {
        let slot = match pollutant {
            Pollutant::Pm25 => &mut self.pm2_5,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::O3 => &mut self.o3,
            Pollutant::Co => &mut self.co,
            Pollutant::No2 => &mut self.no2,
            Pollutant::So2 => &mut self.so2,
        };
        *slot = value;
        self
    }

    /// Keeps only the pollutants that feed the AQI.
    pub fn aqi_subset(&self) -> Self {
        Self {
            pm2_5: self.pm2_5,
            pm10: self.pm10,
            o3: self.o3,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_keys() {
        for p in Pollutant::ALL {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.key()));
        }
    }

    #[test]
    fn test_aqi_subset_drops_gases() {
        let sample = PollutantSample::default()
            .with(Pollutant::Pm25, Some(10.0))
            .with(Pollutant::Co, Some(200.0));
        let subset = sample.aqi_subset();
        assert_eq!(subset.get(Pollutant::Pm25), Some(10.0));
        assert_eq!(subset.get(Pollutant::Co), None);
    }
}
