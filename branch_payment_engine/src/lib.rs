//! Branch Payment Engine
//!
//! Core logic for the branch payment gateway. The engine is provider-agnostic and hosts the two subsystems the
//! gateway is built from:
//!
//! 1. **Nearest-branch resolution** ([`mod@geo`] and [`ResolverApi`]). A fixed, in-memory branch registry is
//!    scanned for the branch closest to a set of coordinates produced by the injected geocoder. The registry is
//!    established once at startup and never mutated, so it is safe to share across request handlers.
//! 2. **Payment lifecycle reconciliation** ([`PaymentFlowApi`]). Payments are initiated against the injected
//!    payment provider, and the two independent confirmation channels (the provider webhook and client polling)
//!    are funnelled through one guarded finalization path. The per-reference state lives behind the
//!    [`traits::TransactionStore`] capability, whose atomic compare-and-set guarantees the order-fulfillment side
//!    effect runs exactly once no matter how many channels observe a successful payment.
//!
//! External collaborators (the geocoding provider, the payment provider, the transaction store) are expressed as
//! traits in [`mod@traits`]; the server crate supplies the concrete adapters. The engine also emits events through
//! a small hook system ([`mod@events`]) so deployments can attach fulfillment behaviour without the engine knowing
//! about it.

mod bpe_api;

pub mod events;
pub mod geo;
pub mod store;
pub mod traits;
pub mod types;

pub use bpe_api::{
    payment_flow_api::{PaymentFlowApi, CALLBACK_PATH},
    payment_objects::{ConfirmationResult, FinalizeOutcome},
    errors::PaymentFlowError,
    resolver_api::ResolverApi,
};
