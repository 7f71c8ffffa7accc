//! Thin client for a Nominatim-compatible geocoding service.
//!
//! The client covers the single endpoint the gateway needs: free-text address search. Every request carries an
//! identifying `User-Agent` header, as required by the public Nominatim usage policy, and an explicit timeout so a
//! slow provider cannot hold a request handler hostage.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::NominatimApi;
pub use config::NominatimConfig;
pub use data_objects::Place;
pub use error::NominatimApiError;
