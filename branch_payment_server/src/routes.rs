//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate
//! module. Keep this module neat and tidy 🙏
//!
//! All provider-facing handlers are async: every one of them performs at least one outbound network call, and a
//! blocking call here would stall the worker thread for every other request it is serving.

use actix_web::{get, web, HttpResponse, Responder};
use branch_payment_engine::{
    geo::BranchRegistry,
    traits::{Geocoder, PaymentProvider, TransactionStore},
    types::TransactionState,
    FinalizeOutcome,
    PaymentFlowApi,
    ResolverApi,
};
use log::*;
use paystack_tools::WebhookEvent;
use serde_json::json;

use crate::{
    data_objects::{InitiatePaymentRequest, NearestBranchRequest, NearestBranchResponse, VerifyPaymentParams, WebhookAck},
    errors::ServerError,
};

// Actix-web cannot register generic handlers through the #[get]/#[post] attribute macros, so routes over the
// engine traits are registered manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Branches  ----------------------------------------------------
#[get("/branches")]
pub async fn branches(registry: web::Data<BranchRegistry>) -> impl Responder {
    trace!("💻️📍️ GET branches");
    HttpResponse::Ok().json(registry.branches())
}

route!(nearest_branch => Post "/nearest-branch" impl Geocoder);
/// Resolve the caller-supplied address to the closest branch in the registry.
///
/// The branch and the distance to it (in km, rounded to 2 decimal places) are returned together. An address the
/// geocoder cannot place is a business outcome (404), not a server fault.
pub async fn nearest_branch<TG>(
    body: web::Json<NearestBranchRequest>,
    api: web::Data<ResolverApi<TG>>,
) -> Result<HttpResponse, ServerError>
where
    TG: Geocoder,
{
    let address = body.into_inner().address.unwrap_or_default();
    if address.trim().is_empty() {
        return Err(ServerError::ValidationError("Address is required".to_string()));
    }
    debug!("💻️📍️ POST nearest-branch for '{address}'");
    let matched = api.resolve_nearest(&address).await?;
    Ok(HttpResponse::Ok().json(NearestBranchResponse::from(matched)))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(initiate_payment => Post "/initiate-payment" impl PaymentProvider, TransactionStore);
/// Open a checkout session with the payment provider and relay its response to the caller.
///
/// The provider's payload is passed through verbatim: the frontend needs the authorization URL and the reference,
/// and anything else the provider includes is its business.
pub async fn initiate_payment<TP, TS>(
    body: web::Json<InitiatePaymentRequest>,
    api: web::Data<PaymentFlowApi<TP, TS>>,
) -> Result<HttpResponse, ServerError>
where
    TP: PaymentProvider,
    TS: TransactionStore,
{
    let request = body.into_inner();
    debug!("💻️💳️ POST initiate-payment ({} {})", request.amount.unwrap_or_default(), request.currency.as_deref().unwrap_or("?"));
    let session = api.initiate_payment(request.into_intent()).await?;
    info!("💻️💳️ Checkout session [{}] handed to caller", session.reference);
    Ok(HttpResponse::Ok().json(session.raw))
}

route!(paystack_webhook => Post "/webhook" impl PaymentProvider, TransactionStore);
/// Provider-to-server completion notification.
///
/// The delivery only carries a reference; the transaction state is always re-read from the provider rather than
/// trusted from the webhook body. Finalization goes through the engine's guarded flow, so a webhook that loses
/// the race against a client poll acknowledges without re-running fulfillment.
pub async fn paystack_webhook<TP, TS>(
    body: web::Json<WebhookEvent>,
    api: web::Data<PaymentFlowApi<TP, TS>>,
) -> Result<HttpResponse, ServerError>
where
    TP: PaymentProvider,
    TS: TransactionStore,
{
    let event = body.into_inner();
    trace!("💻️🔔️ Received webhook event '{}'", event.event);
    let reference = event.data.reference.unwrap_or_default();
    if reference.trim().is_empty() {
        return Err(ServerError::ValidationError("Reference is required".to_string()));
    }
    let result = api.confirm_payment(&reference).await?;
    let ack = match result.finalization {
        FinalizeOutcome::Finalized(TransactionState::FinalizedSuccess) => {
            WebhookAck::new(format!("Payment [{reference}] confirmed and order fulfillment triggered"))
        },
        FinalizeOutcome::Finalized(state) => WebhookAck::new(format!("Payment [{reference}] recorded as {state}")),
        FinalizeOutcome::AlreadyFinalized(state) => {
            WebhookAck::new(format!("Payment [{reference}] was already {state}"))
        },
        FinalizeOutcome::Pending => WebhookAck::new(format!("Payment [{reference}] is still pending")),
    };
    Ok(HttpResponse::Ok().json(ack))
}

route!(verify_payment => Get "/verify-payment" impl PaymentProvider, TransactionStore);
/// Client-polled confirmation channel.
///
/// Browsers land here after the provider redirects them back. The response mirrors the provider's verification
/// payload so the frontend can render the transaction without a second lookup. Finalization shares the same
/// guarded flow as the webhook, so polling can never double-trigger fulfillment.
pub async fn verify_payment<TP, TS>(
    query: web::Query<VerifyPaymentParams>,
    api: web::Data<PaymentFlowApi<TP, TS>>,
) -> Result<HttpResponse, ServerError>
where
    TP: PaymentProvider,
    TS: TransactionStore,
{
    let reference = query.into_inner().reference.unwrap_or_default();
    if reference.trim().is_empty() {
        return Err(ServerError::ValidationError("Reference is required".to_string()));
    }
    debug!("💻️💳️ GET verify-payment for [{reference}]");
    let result = api.confirm_payment(&reference).await?;
    let outcome = result.outcome;
    Ok(HttpResponse::Ok().json(json!({
        "status": outcome.status.as_str(),
        "message": outcome.message,
        "data": outcome.raw,
    })))
}
