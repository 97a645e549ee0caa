use crate::domain::visibility::VisibilityFlags;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub open_meteo: OpenMeteoSettings,
    /// Visibility switches keyed by viewer id
    #[serde(default)]
    pub viewers: HashMap<String, VisibilityFlags>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenMeteoSettings {
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    #[serde(default = "default_past_days")]
    pub past_days: u32,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    #[serde(default = "default_geocode_timeout")]
    pub geocode_timeout_secs: u64,
    #[serde(default = "default_air_quality_timeout")]
    pub air_quality_timeout_secs: u64,
}

impl Default for OpenMeteoSettings {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            air_quality_url: default_air_quality_url(),
            past_days: default_past_days(),
            forecast_days: default_forecast_days(),
            geocode_timeout_secs: default_geocode_timeout(),
            air_quality_timeout_secs: default_air_quality_timeout(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_geocode_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_past_days() -> u32 {
    6
}

fn default_forecast_days() -> u32 {
    1
}

fn default_geocode_timeout() -> u64 {
    15
}

fn default_air_quality_timeout() -> u64 {
    20
}

/// `AQI__SECTION__KEY` environment variables, e.g. `AQI__VIEWERS__GUEST__PM2_5=false`
fn env_overlay() -> config::Environment {
    config::Environment::with_prefix("AQI")
        .separator("__")
        .try_parsing(true)
}

/// Load `config/app.*` (optional) overlaid with environment variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(env_overlay())
        .build()?;

    Ok(settings.try_deserialize()?)
}
