use std::time::Duration;

use actix_web::{http::KeepAlive, middleware::Logger, web, App, HttpServer};
use branch_payment_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    geo::BranchRegistry,
    store::MemoryTransactionStore,
    PaymentFlowApi,
    ResolverApi,
};
use log::info;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{NominatimGeocoder, PaystackProvider, PAYSTACK_SIGNATURE_HEADER},
    middleware::HmacMiddlewareFactory,
    routes::{branches, health, InitiatePaymentRoute, NearestBranchRoute, PaystackWebhookRoute, VerifyPaymentRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let geocoder =
        NominatimGeocoder::new(config.nominatim.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let provider =
        PaystackProvider::new(config.paystack.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    // One store for the whole process: the webhook channel and the client-poll channel must race on the SAME
    // compare-and-set, or fulfillment could run twice.
    let store = MemoryTransactionStore::new();
    let registry = BranchRegistry::lagos_default();
    let mut hooks = EventHooks::default();
    hooks.on_payment_confirmed(|event| {
        Box::pin(async move {
            // Order fulfillment lives behind the payment-confirmed hook. The guarded finalize upstream fires it
            // once per reference, however many confirmation channels report success.
            info!("📦️ Fulfilling order for payment [{}]", event.reference);
        })
    });
    let handlers = EventHandlers::new(128, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, geocoder, provider, store, registry, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    geocoder: NominatimGeocoder,
    provider: PaystackProvider,
    store: MemoryTransactionStore,
    registry: BranchRegistry,
    producers: EventProducers,
) -> Result<actix_web::dev::Server, ServerError> {
    let signature_key = config.paystack.secret_key.clone();
    let signature_checks = config.webhook_signature_checks;
    let srv = HttpServer::new(move || {
        let resolver_api = ResolverApi::new(geocoder.clone(), registry.clone());
        let payment_api = PaymentFlowApi::new(provider.clone(), store.clone(), producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bpg::access_log"))
            .app_data(web::Data::new(resolver_api))
            .app_data(web::Data::new(payment_api))
            .app_data(web::Data::new(registry.clone()));
        let webhook_scope = web::scope("/paystack")
            .wrap(HmacMiddlewareFactory::new(PAYSTACK_SIGNATURE_HEADER, signature_key.clone(), signature_checks))
            .service(PaystackWebhookRoute::<PaystackProvider, MemoryTransactionStore>::new());
        app.service(health)
            .service(branches)
            .service(NearestBranchRoute::<NominatimGeocoder>::new())
            .service(InitiatePaymentRoute::<PaystackProvider, MemoryTransactionStore>::new())
            .service(VerifyPaymentRoute::<PaystackProvider, MemoryTransactionStore>::new())
            .service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
