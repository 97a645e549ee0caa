// Application state for HTTP handlers
use crate::application::aqi_service::AqiService;

#[derive(Clone)]
pub struct AppState {
    pub aqi_service: AqiService,
}
