use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use bpg_common::{Kobo, Secret};
use branch_payment_engine::{
    events::EventProducers,
    store::MemoryTransactionStore,
    traits::PaymentProviderError,
    types::{CheckoutSession, VerificationOutcome, VerifiedStatus},
    PaymentFlowApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, post_request},
    mocks::MockPaymentProvider,
};
use crate::{
    helpers::calculate_hmac,
    integrations::PAYSTACK_SIGNATURE_HEADER,
    middleware::HmacMiddlewareFactory,
    routes::{InitiatePaymentRoute, PaystackWebhookRoute, VerifyPaymentRoute},
};

type TestFlowApi = PaymentFlowApi<MockPaymentProvider, MemoryTransactionStore>;

fn checkout_envelope() -> Value {
    json!({
        "status": true,
        "message": "Authorization URL created",
        "data": {
            "authorization_url": "https://checkout.paystack.com/abc123",
            "access_code": "abc123",
            "reference": "ref_init_1"
        }
    })
}

fn success_outcome(reference: &str) -> VerificationOutcome {
    VerificationOutcome::new(
        VerifiedStatus::Success,
        "Verification successful",
        json!({"reference": reference, "status": "success", "amount": 1000, "currency": "NGN"}),
    )
}

//----------------------------------------------   Initiate  ----------------------------------------------------

#[actix_web::test]
async fn initiate_rejects_missing_fields_with_specific_messages() {
    let _ = env_logger::try_init().ok();
    let cases = [
        (json!({"amount": 10.0, "currency": "NGN", "frontendCallbackOrigin": "https://shop.example.com"}), "Email is required"),
        (json!({"email": "ada@example.com", "currency": "NGN", "frontendCallbackOrigin": "https://shop.example.com"}), "Amount is required"),
        (json!({"email": "ada@example.com", "amount": 10.0, "frontendCallbackOrigin": "https://shop.example.com"}), "Currency is required"),
        (json!({"email": "ada@example.com", "amount": 10.0, "currency": "NGN"}), "Callback origin is required"),
    ];
    for (body, expected) in cases {
        let (status, body) = post_request("/initiate-payment", body, configure_untouched_provider).await.unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": expected}).to_string());
    }
}

#[actix_web::test]
async fn initiate_rejects_a_zero_amount() {
    let body = json!({
        "email": "ada@example.com",
        "amount": 0.0,
        "currency": "NGN",
        "frontendCallbackOrigin": "https://shop.example.com"
    });
    let (status, body) = post_request("/initiate-payment", body, configure_untouched_provider).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Amount must be greater than zero"}).to_string());
}

#[actix_web::test]
async fn initiate_converts_major_units_and_relays_the_provider_payload() {
    let body = json!({
        "email": "ada@example.com",
        "amount": 10.00,
        "currency": "NGN",
        "frontendCallbackOrigin": "https://shop.example.com"
    });
    let (status, body) = post_request("/initiate-payment", body, configure_initialize_ok).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    // The caller sees the provider's initialize envelope verbatim.
    assert_eq!(value, checkout_envelope());
}

#[actix_web::test]
async fn initiate_surfaces_the_provider_error_body() {
    let body = json!({
        "email": "ada@example.com",
        "amount": 10.00,
        "currency": "NGN",
        "frontendCallbackOrigin": "https://shop.example.com"
    });
    let (status, body) = post_request("/initiate-payment", body, configure_initialize_refused).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["upstream"]["message"], "Invalid key");
}

//----------------------------------------------   Confirmation  ------------------------------------------------

#[actix_web::test]
async fn webhook_without_a_reference_is_rejected() {
    let body = json!({"event": "charge.success", "data": {"id": 998877}});
    let (status, body) = post_request("/webhook", body, configure_verify_success).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Reference is required"}).to_string());
}

#[actix_web::test]
async fn verify_without_a_reference_is_rejected() {
    let (status, body) = get_request("/verify-payment", configure_verify_success).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Reference is required"}).to_string());
}

#[actix_web::test]
async fn verify_failures_surface_as_server_errors() {
    let (status, body) = get_request("/verify-payment?reference=ref_down", configure_verify_unavailable).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert!(value["error"].as_str().unwrap().contains("payment provider"));
}

#[actix_web::test]
async fn both_confirmation_channels_share_one_finalize_guard() {
    let _ = env_logger::try_init().ok();
    let app = App::new().configure(configure_verify_success);
    let service = test::init_service(app).await;

    // The provider's webhook lands first and wins the finalize.
    let body = json!({"event": "charge.success", "data": {"reference": "ref_99"}});
    let req = TestRequest::post().uri("/webhook").set_json(&body).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(res).await;
    assert!(ack["message"].as_str().unwrap().contains("order fulfillment triggered"));

    // The client polls moments later: same verdict, no second fulfillment.
    let req = TestRequest::get().uri("/verify-payment?reference=ref_99").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let mirror: Value = test::read_body_json(res).await;
    assert_eq!(mirror["status"], "success");
    assert_eq!(mirror["data"]["reference"], "ref_99");

    // A replayed webhook acknowledges without doing anything.
    let req = TestRequest::post().uri("/webhook").set_json(&body).to_request();
    let ack: Value = test::read_body_json(test::call_service(&service, req).await).await;
    assert!(ack["message"].as_str().unwrap().contains("already"));
}

#[actix_web::test]
async fn verify_mirrors_the_provider_payload() {
    let (status, body) = get_request("/verify-payment?reference=ref_7", configure_verify_success).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["message"], "Verification successful");
    assert_eq!(value["data"]["amount"], 1000);
}

//----------------------------------------------   Webhook signatures  ------------------------------------------

#[actix_web::test]
async fn signed_webhooks_pass_the_signature_check() {
    let service = test::init_service(App::new().service(signed_webhook_scope(true))).await;
    let payload = json!({"event": "charge.success", "data": {"reference": "ref_sig"}}).to_string();
    let signature = calculate_hmac("sk_test_key", payload.as_bytes());
    let req = TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header(("content-type", "application/json"))
        .insert_header((PAYSTACK_SIGNATURE_HEADER, signature))
        .set_payload(payload)
        .to_request();
    let res = test::try_call_service(&service, req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unsigned_webhooks_are_rejected() {
    let service = test::init_service(App::new().service(signed_webhook_scope(true))).await;
    let payload = json!({"event": "charge.success", "data": {"reference": "ref_sig"}}).to_string();
    let req = TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header(("content-type", "application/json"))
        .set_payload(payload)
        .to_request();
    let err = test::try_call_service(&service, req).await.expect_err("expected the middleware to refuse");
    assert_eq!(err.to_string(), "No webhook signature found.");
}

#[actix_web::test]
async fn mis_signed_webhooks_are_rejected() {
    let service = test::init_service(App::new().service(signed_webhook_scope(true))).await;
    let payload = json!({"event": "charge.success", "data": {"reference": "ref_sig"}}).to_string();
    let signature = calculate_hmac("sk_wrong_key", payload.as_bytes());
    let req = TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header(("content-type", "application/json"))
        .insert_header((PAYSTACK_SIGNATURE_HEADER, signature))
        .set_payload(payload)
        .to_request();
    let err = test::try_call_service(&service, req).await.expect_err("expected the middleware to refuse");
    assert_eq!(err.to_string(), "Invalid webhook signature.");
}

#[actix_web::test]
async fn signature_checks_can_be_disabled_for_local_testing() {
    let service = test::init_service(App::new().service(signed_webhook_scope(false))).await;
    let payload = json!({"event": "charge.success", "data": {"reference": "ref_sig"}}).to_string();
    let req = TestRequest::post()
        .uri("/paystack/webhook")
        .insert_header(("content-type", "application/json"))
        .set_payload(payload)
        .to_request();
    let res = test::try_call_service(&service, req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

//----------------------------------------------   Fixtures  ----------------------------------------------------

fn signed_webhook_scope(checks_enabled: bool) -> impl actix_web::dev::HttpServiceFactory {
    web::scope("/paystack")
        .wrap(HmacMiddlewareFactory::new(
            PAYSTACK_SIGNATURE_HEADER,
            Secret::new("sk_test_key".to_string()),
            checks_enabled,
        ))
        .configure(configure_verify_success)
}

/// The provider must never be called: requests are expected to fail validation first.
fn configure_untouched_provider(cfg: &mut ServiceConfig) {
    let provider = MockPaymentProvider::new();
    let api = TestFlowApi::new(provider, MemoryTransactionStore::new(), EventProducers::default());
    cfg.service(InitiatePaymentRoute::<MockPaymentProvider, MemoryTransactionStore>::new())
        .app_data(web::Data::new(api));
}

fn configure_initialize_ok(cfg: &mut ServiceConfig) {
    let mut provider = MockPaymentProvider::new();
    provider
        .expect_initialize()
        .withf(|request| {
            request.amount == Kobo::from(1000) && request.callback_url == "https://shop.example.com/payment-callback"
        })
        .returning(|_| {
            let envelope = checkout_envelope();
            Ok(CheckoutSession {
                checkout_url: "https://checkout.paystack.com/abc123".to_string(),
                reference: "ref_init_1".to_string(),
                raw: envelope,
            })
        });
    let api = TestFlowApi::new(provider, MemoryTransactionStore::new(), EventProducers::default());
    cfg.service(InitiatePaymentRoute::<MockPaymentProvider, MemoryTransactionStore>::new())
        .app_data(web::Data::new(api));
}

fn configure_initialize_refused(cfg: &mut ServiceConfig) {
    let mut provider = MockPaymentProvider::new();
    provider.expect_initialize().returning(|_| {
        Err(PaymentProviderError::Upstream {
            status: 401,
            body: json!({"status": false, "message": "Invalid key"}).to_string(),
        })
    });
    let api = TestFlowApi::new(provider, MemoryTransactionStore::new(), EventProducers::default());
    cfg.service(InitiatePaymentRoute::<MockPaymentProvider, MemoryTransactionStore>::new())
        .app_data(web::Data::new(api));
}

fn configure_verify_success(cfg: &mut ServiceConfig) {
    let mut provider = MockPaymentProvider::new();
    provider.expect_verify().returning(|reference| Ok(success_outcome(reference)));
    let api = TestFlowApi::new(provider, MemoryTransactionStore::new(), EventProducers::default());
    cfg.service(PaystackWebhookRoute::<MockPaymentProvider, MemoryTransactionStore>::new())
        .service(VerifyPaymentRoute::<MockPaymentProvider, MemoryTransactionStore>::new())
        .app_data(web::Data::new(api));
}

fn configure_verify_unavailable(cfg: &mut ServiceConfig) {
    let mut provider = MockPaymentProvider::new();
    provider.expect_verify().returning(|_| {
        Err(PaymentProviderError::Unreachable("error sending request".to_string()))
    });
    let api = TestFlowApi::new(provider, MemoryTransactionStore::new(), EventProducers::default());
    cfg.service(VerifyPaymentRoute::<MockPaymentProvider, MemoryTransactionStore>::new())
        .app_data(web::Data::new(api));
}
