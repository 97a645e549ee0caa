// Domain errors surfaced to callers
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AqiError {
    #[error("No air quality data available at this time.")]
    NoData,

    #[error("Place not found. Try a different city.")]
    PlaceNotFound(String),

    #[error("invalid upstream timestamp: {0}")]
    InvalidTimestamp(String),
}
