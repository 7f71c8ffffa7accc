use thiserror::Error;

use crate::types::Coordinates;

/// Adapter contract for the external geocoding provider.
///
/// One attempt per call: a failed geocode surfaces immediately to the caller instead of being retried, since the
/// caller is a synchronous user-facing request. Retry policy, if anyone wants one, belongs to a wrapping layer.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// Resolve a free-text address to coordinates.
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocoderError>;
}

#[derive(Debug, Clone, Error)]
pub enum GeocoderError {
    #[error("Address cannot be empty")]
    EmptyAddress,
    #[error("No location found for '{0}'")]
    NotFound(String),
    #[error("The geocoding provider returned an error. Status {status}. {body}")]
    Upstream { status: u16, body: String },
    #[error("The geocoding provider is unreachable. {0}")]
    Unreachable(String),
    #[error("The geocoding request timed out after {0}ms")]
    Timeout(u64),
    #[error("Could not interpret the geocoding response. {0}")]
    InvalidResponse(String),
}
