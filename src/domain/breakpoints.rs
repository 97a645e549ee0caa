// US EPA breakpoint tables and sub-index interpolation

use super::pollutant::Pollutant;

/// One linear interpolation region of a breakpoint table.
///
/// Tables are ascending and non-overlapping. A concentration in no segment
/// (above the top, below zero, or in a precision gap such as 12.0..12.1) has
/// no sub-index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub conc_lo: f64,
    pub conc_hi: f64,
    pub index_lo: u16,
    pub index_hi: u16,
}

const fn seg(conc_lo: f64, conc_hi: f64, index_lo: u16, index_hi: u16) -> Segment {
    Segment {
        conc_lo,
        conc_hi,
        index_lo,
        index_hi,
    }
}

/// PM2.5 in µg/m³.
pub static PM25_SEGMENTS: [Segment; 7] = [
    seg(0.0, 12.0, 0, 50),
    seg(12.1, 35.4, 51, 100),
    seg(35.5, 55.4, 101, 150),
    seg(55.5, 150.4, 151, 200),
    seg(150.5, 250.4, 201, 300),
    seg(250.5, 350.4, 301, 400),
    seg(350.5, 500.4, 401, 500),
];

/// PM10 in µg/m³.
pub static PM10_SEGMENTS: [Segment; 7] = [
    seg(0.0, 54.0, 0, 50),
    seg(55.0, 154.0, 51, 100),
    seg(155.0, 254.0, 101, 150),
    seg(255.0, 354.0, 151, 200),
    seg(355.0, 424.0, 201, 300),
    seg(425.0, 504.0, 301, 400),
    seg(505.0, 604.0, 401, 500),
];

/// Ozone 8-hour average in ppm.
pub static O3_SEGMENTS: [Segment; 5] = [
    seg(0.000, 0.054, 0, 50),
    seg(0.055, 0.070, 51, 100),
    seg(0.071, 0.085, 101, 150),
    seg(0.086, 0.105, 151, 200),
    seg(0.106, 0.200, 201, 300),
];

/// Top of the ozone table; converted readings are saturated here.
pub const O3_PPM_MAX: f64 = 0.200;

pub const OZONE_MOLAR_MASS_G_PER_MOL: f64 = 48.0;
pub const REFERENCE_TEMP_C: f64 = 25.0;
pub const REFERENCE_PRESSURE_HPA: f64 = 1013.25;

/// Breakpoint table for a pollutant. CO, NO2 and SO2 do not feed the AQI here.
pub fn segments(pollutant: Pollutant) -> Option<&'static [Segment]> {
    match pollutant {
        Pollutant::Pm25 => Some(&PM25_SEGMENTS[..]),
        Pollutant::Pm10 => Some(&PM10_SEGMENTS[..]),
        Pollutant::O3 => Some(&O3_SEGMENTS[..]),
        Pollutant::Co | Pollutant::No2 | Pollutant::So2 => None,
    }
}

/// Interpolate the sub-index for a concentration already in table units.
///
/// Rounds half to even. Returns `None` when `x` is outside every segment.
pub fn sub_index(pollutant: Pollutant, x: f64) -> Option<u16> {
    let table = segments(pollutant)?;
    table
        .iter()
        .find(|s| s.conc_lo <= x && x <= s.conc_hi)
        .map(|s| {
            // AQI = ((Ihi - Ilo) / (Chi - Clo)) * (C - Clo) + Ilo
            let slope = f64::from(s.index_hi - s.index_lo) / (s.conc_hi - s.conc_lo);
            let value = slope * (x - s.conc_lo) + f64::from(s.index_lo);
            value.round_ties_even() as u16
        })
}

/// Convert ozone from µg/m³ to ppm using the ideal-gas molar volume.
pub fn ugm3_to_ppm_o3(ugm3: f64, temp_c: f64, pressure_hpa: f64) -> f64 {
    let kelvin = temp_c + 273.15;
    let molar_volume = 24.45 * (kelvin / 298.15) * (REFERENCE_PRESSURE_HPA / pressure_hpa);
    (ugm3 / 1000.0) * (molar_volume / OZONE_MOLAR_MASS_G_PER_MOL)
}

/// Ozone ppm at reference conditions, clamped to the table range.
pub fn ozone_table_ppm(ugm3: f64) -> f64 {
    ugm3_to_ppm_o3(ugm3, REFERENCE_TEMP_C, REFERENCE_PRESSURE_HPA).clamp(0.0, O3_PPM_MAX)
}
