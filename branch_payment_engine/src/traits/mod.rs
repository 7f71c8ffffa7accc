//! Capability traits the engine is built against.
//!
//! The engine never talks to a concrete geocoding service, payment provider, or storage backend. It talks to these
//! traits, and the server crate supplies adapters for the real collaborators. Tests supply stubs or mocks.

mod geocoder;
mod payment_provider;
mod transaction_store;

pub use geocoder::{Geocoder, GeocoderError};
pub use payment_provider::{PaymentProvider, PaymentProviderError};
pub use transaction_store::{TransactionStore, TransactionStoreError};
