// Domain layer - AQI computation and viewer redaction, no I/O
pub mod aqi;
pub mod breakpoints;
pub mod category;
pub mod error;
pub mod measurement;
pub mod pollutant;
pub mod report;
pub mod series;
pub mod visibility;
