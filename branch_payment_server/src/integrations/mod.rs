//! Adapters between the external service clients and the engine's capability traits.

mod nominatim;
mod paystack;

pub use nominatim::NominatimGeocoder;
pub use paystack::{PaystackProvider, PAYSTACK_SIGNATURE_HEADER};
