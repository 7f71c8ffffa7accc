use thiserror::Error;

use crate::{
    geo::distance::haversine_km,
    types::{Branch, Coordinates, NearestMatch},
};

/// The fixed, ordered collection of branches the gateway can assign customers to.
///
/// The registry is established once at startup and never mutated, which makes it freely shareable across request
/// handlers without locking. Emptiness is rejected at construction so `nearest` never has to deal with it.
#[derive(Debug, Clone)]
pub struct BranchRegistry {
    branches: Vec<Branch>,
}

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("The branch registry cannot be empty")]
    EmptyRegistry,
}

impl BranchRegistry {
    pub fn new(branches: Vec<Branch>) -> Result<Self, RegistryError> {
        if branches.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }
        Ok(Self { branches })
    }

    /// The built-in Lagos branch registry.
    pub fn lagos_default() -> Self {
        let branches = vec![
            Branch::new(1, "Ikeja Pharmacy", 6.6018, 3.3515),
            Branch::new(2, "Yaba Pharmacy", 6.5095, 3.3711),
            Branch::new(3, "Surulere Pharmacy", 6.4926, 3.3615),
            Branch::new(4, "Lekki Pharmacy", 6.4478, 3.4723),
            Branch::new(5, "Victoria Island Pharmacy", 6.4281, 3.4219),
            Branch::new(6, "Ikorodu Pharmacy", 6.6194, 3.5105),
        ];
        // The list above is non-empty, so the invariant check cannot fire.
        Self { branches }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Find the branch closest to `query`.
    ///
    /// Linear scan with a strict less-than comparison, so when two branches are exactly equidistant the one that
    /// occurs first in registry order wins. Keep it that way: callers and tests rely on the tie-break being
    /// deterministic.
    pub fn nearest(&self, query: &Coordinates) -> NearestMatch {
        let mut best = &self.branches[0];
        let mut best_distance = haversine_km(query, &best.coordinates());
        for branch in &self.branches[1..] {
            let distance = haversine_km(query, &branch.coordinates());
            if distance < best_distance {
                best = branch;
                best_distance = distance;
            }
        }
        NearestMatch { branch: best.clone(), distance_km: best_distance }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn coords(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn an_empty_registry_is_a_configuration_error() {
        assert!(matches!(BranchRegistry::new(vec![]), Err(RegistryError::EmptyRegistry)));
    }

    #[test]
    fn nearest_always_returns_a_registry_member() {
        let registry = BranchRegistry::lagos_default();
        let queries =
            [coords(6.60, 3.35), coords(0.0, 0.0), coords(-33.87, 151.21), coords(51.5, -0.12), coords(6.45, 3.47)];
        for q in queries {
            let matched = registry.nearest(&q);
            assert!(registry.branches().iter().any(|b| *b == matched.branch));
            assert!(matched.distance_km >= 0.0);
        }
    }

    #[test]
    fn equidistant_branches_resolve_to_the_first_in_registry_order() {
        let registry = BranchRegistry::new(vec![
            Branch::new(7, "First", 6.50, 3.35),
            Branch::new(3, "Duplicate of first", 6.50, 3.35),
            Branch::new(9, "Far away", 9.05, 7.49),
        ])
        .unwrap();
        // Both candidates are at the identical location, so their distances are bit-identical.
        for _ in 0..10 {
            let matched = registry.nearest(&coords(6.55, 3.40));
            assert_eq!(matched.branch.id, 7);
        }
    }

    #[test]
    fn ikeja_query_resolves_to_ikeja_pharmacy() {
        let registry = BranchRegistry::lagos_default();
        let matched = registry.nearest(&coords(6.60, 3.35));
        assert_eq!(matched.branch.id, 1);
        assert_eq!(matched.branch.name, "Ikeja Pharmacy");
        assert!(matched.distance_km < 0.5, "expected under half a km, got {}", matched.distance_km);
    }
}
