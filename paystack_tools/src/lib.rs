//! Client for the Paystack transaction API.
//!
//! Two endpoints are covered, because they are the only two the gateway uses:
//! * `POST /transaction/initialize` creates a provider-hosted checkout session and returns the authorization URL
//!   together with the transaction reference.
//! * `GET /transaction/verify/{reference}` reports the current state of a transaction. It is a pure query and can
//!   be called any number of times for the same reference.
//!
//! All requests are bearer-token authenticated with the merchant secret key and carry an explicit timeout.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::PaystackApi;
pub use config::PaystackConfig;
pub use data_objects::{ApiEnvelope, InitializeData, InitializeRequest, VerifyData, WebhookData, WebhookEvent};
pub use error::PaystackApiError;
