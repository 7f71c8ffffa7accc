//! Geospatial primitives: the haversine distance calculation and the fixed branch registry.

mod distance;
mod registry;

pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use registry::{BranchRegistry, RegistryError};
