use std::fmt::Debug;

use log::*;

use crate::{
    geo::BranchRegistry,
    traits::{Geocoder, GeocoderError},
    types::NearestMatch,
};

/// `ResolverApi` answers "which branch is closest to this address" by chaining the injected geocoder with the
/// fixed branch registry.
pub struct ResolverApi<G> {
    geocoder: G,
    registry: BranchRegistry,
}

impl<G> Debug for ResolverApi<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResolverApi")
    }
}

impl<G> ResolverApi<G> {
    pub fn new(geocoder: G, registry: BranchRegistry) -> Self {
        Self { geocoder, registry }
    }

    pub fn registry(&self) -> &BranchRegistry {
        &self.registry
    }
}

impl<G> ResolverApi<G>
where G: Geocoder
{
    /// Resolve a free-text address to the nearest branch and the distance to it.
    pub async fn resolve_nearest(&self, address: &str) -> Result<NearestMatch, GeocoderError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocoderError::EmptyAddress);
        }
        let coordinates = self.geocoder.geocode(address).await?;
        let matched = self.registry.nearest(&coordinates);
        debug!(
            "🗺️📍️ '{address}' geocoded to {coordinates}. Nearest branch is {} at {:.2} km",
            matched.branch, matched.distance_km
        );
        Ok(matched)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Coordinates;

    #[derive(Clone)]
    struct FixedGeocoder(Coordinates);

    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Coordinates, GeocoderError> {
            Ok(self.0)
        }
    }

    #[derive(Clone)]
    struct NoResultGeocoder;

    impl Geocoder for NoResultGeocoder {
        async fn geocode(&self, address: &str) -> Result<Coordinates, GeocoderError> {
            Err(GeocoderError::NotFound(address.to_string()))
        }
    }

    #[tokio::test]
    async fn ikeja_address_resolves_to_the_ikeja_branch() {
        let geocoder = FixedGeocoder(Coordinates::new(6.60, 3.35).unwrap());
        let api = ResolverApi::new(geocoder, BranchRegistry::lagos_default());
        let matched = api.resolve_nearest("Ikeja, Lagos").await.unwrap();
        assert_eq!(matched.branch.id, 1);
        assert!(matched.distance_km < 0.5);
    }

    #[tokio::test]
    async fn blank_addresses_are_rejected_before_the_provider_is_called() {
        let api = ResolverApi::new(NoResultGeocoder, BranchRegistry::lagos_default());
        // NoResultGeocoder would return NotFound; EmptyAddress proves the guard fired first.
        assert!(matches!(api.resolve_nearest("   ").await, Err(GeocoderError::EmptyAddress)));
    }

    #[tokio::test]
    async fn unresolvable_addresses_surface_as_not_found() {
        let api = ResolverApi::new(NoResultGeocoder, BranchRegistry::lagos_default());
        assert!(matches!(api.resolve_nearest("Atlantis").await, Err(GeocoderError::NotFound(_))));
    }
}
