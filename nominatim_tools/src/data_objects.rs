use serde::Deserialize;

use crate::NominatimApiError;

/// A single result from the search endpoint.
///
/// Nominatim returns coordinates as strings, so they are kept as received and parsed on demand.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl Place {
    /// Parse the `(lat, lon)` pair this place points at.
    pub fn coordinates(&self) -> Result<(f64, f64), NominatimApiError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| NominatimApiError::JsonError(format!("Invalid latitude '{}'. {e}", self.lat)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|e| NominatimApiError::JsonError(format!("Invalid longitude '{}'. {e}", self.lon)))?;
        Ok((lat, lon))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coordinates_are_parsed_from_strings() {
        let place: Place =
            serde_json::from_str(r#"{"lat": "6.6018", "lon": "3.3515", "display_name": "Ikeja, Lagos"}"#).unwrap();
        let (lat, lon) = place.coordinates().unwrap();
        assert!((lat - 6.6018).abs() < f64::EPSILON);
        assert!((lon - 3.3515).abs() < f64::EPSILON);
    }

    #[test]
    fn garbage_coordinates_are_reported() {
        let place = Place { lat: "not-a-number".to_string(), lon: "3.35".to_string(), display_name: String::new() };
        assert!(matches!(place.coordinates(), Err(NominatimApiError::JsonError(_))));
    }
}
