use actix_web::{http::StatusCode, web, web::ServiceConfig};
use branch_payment_engine::{geo::BranchRegistry, traits::GeocoderError, types::Coordinates, ResolverApi};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, post_request},
    mocks::MockGeocoder,
};
use crate::routes::{branches, NearestBranchRoute};

#[actix_web::test]
async fn missing_address_is_rejected_with_a_specific_message() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("/nearest-branch", json!({}), configure_ikeja).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Address is required"}).to_string());
}

#[actix_web::test]
async fn blank_address_is_rejected_like_a_missing_one() {
    let (status, body) = post_request("/nearest-branch", json!({"address": "  "}), configure_ikeja).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Address is required"}).to_string());
}

#[actix_web::test]
async fn ikeja_resolves_to_the_ikeja_branch() {
    let (status, body) =
        post_request("/nearest-branch", json!({"address": "Ikeja, Lagos"}), configure_ikeja).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["nearestBranch"]["id"], 1);
    assert_eq!(value["nearestBranch"]["name"], "Ikeja Pharmacy");
    let distance = value["distanceKm"].as_f64().unwrap();
    assert!(distance < 0.5, "expected under half a km, got {distance}");
    // Distances on the wire carry at most 2 decimal places.
    assert!(((distance * 100.0).round() - distance * 100.0).abs() < 1e-9);
}

#[actix_web::test]
async fn unresolvable_addresses_are_a_business_not_found() {
    let (status, body) =
        post_request("/nearest-branch", json!({"address": "Atlantis"}), configure_not_found).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert!(value["error"].as_str().unwrap().contains("No location found"));
}

#[actix_web::test]
async fn branches_are_listed_in_registry_order() {
    let (status, body) = get_request("/branches", configure_branches).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    let listed = value.as_array().unwrap();
    assert_eq!(listed.len(), 6);
    assert_eq!(listed[0]["id"], 1);
    assert_eq!(listed[0]["name"], "Ikeja Pharmacy");
    assert_eq!(listed[5]["id"], 6);
}

fn configure_ikeja(cfg: &mut ServiceConfig) {
    let mut geocoder = MockGeocoder::new();
    geocoder.expect_geocode().returning(|_| Ok(Coordinates::new(6.6018, 3.3515).unwrap()));
    let api = ResolverApi::new(geocoder, BranchRegistry::lagos_default());
    cfg.service(NearestBranchRoute::<MockGeocoder>::new()).app_data(web::Data::new(api));
}

fn configure_not_found(cfg: &mut ServiceConfig) {
    let mut geocoder = MockGeocoder::new();
    geocoder.expect_geocode().returning(|address| Err(GeocoderError::NotFound(address.to_string())));
    let api = ResolverApi::new(geocoder, BranchRegistry::lagos_default());
    cfg.service(NearestBranchRoute::<MockGeocoder>::new()).app_data(web::Data::new(api));
}

fn configure_branches(cfg: &mut ServiceConfig) {
    cfg.service(branches).app_data(web::Data::new(BranchRegistry::lagos_default()));
}
