use branch_payment_engine::{
    traits::{Geocoder, GeocoderError},
    types::Coordinates,
};
use log::debug;
use nominatim_tools::{NominatimApi, NominatimApiError, NominatimConfig};

/// Engine-facing geocoder backed by [`NominatimApi`].
#[derive(Clone)]
pub struct NominatimGeocoder {
    api: NominatimApi,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, NominatimApiError> {
        Ok(Self { api: NominatimApi::new(config)? })
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocoderError> {
        // One result is all the resolver needs; Nominatim orders by relevance.
        let places = self.api.search(address, 1).await.map_err(geocoder_error_from)?;
        let place = places.into_iter().next().ok_or_else(|| GeocoderError::NotFound(address.to_string()))?;
        debug!("🗺️ '{address}' matched '{}'", place.display_name);
        let (lat, lon) = place.coordinates().map_err(|e| GeocoderError::InvalidResponse(e.to_string()))?;
        Coordinates::new(lat, lon).map_err(|e| GeocoderError::InvalidResponse(e.to_string()))
    }
}

fn geocoder_error_from(e: NominatimApiError) -> GeocoderError {
    match e {
        NominatimApiError::QueryError { status, message } => GeocoderError::Upstream { status, body: message },
        NominatimApiError::Timeout(ms) => GeocoderError::Timeout(ms),
        NominatimApiError::JsonError(m) => GeocoderError::InvalidResponse(m),
        NominatimApiError::Initialization(m) | NominatimApiError::ResponseError(m) => GeocoderError::Unreachable(m),
    }
}
