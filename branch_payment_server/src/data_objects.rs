use branch_payment_engine::types::{Branch, NearestMatch, PaymentIntent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestBranchRequest {
    /// Optional so a missing field reaches the handler, which answers with a proper validation message instead
    /// of a generic deserialization error.
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestBranchResponse {
    pub nearest_branch: Branch,
    pub distance_km: f64,
}

impl From<NearestMatch> for NearestBranchResponse {
    fn from(matched: NearestMatch) -> Self {
        // Distances are reported to 2 decimal places; internal computation stays at full precision.
        let distance_km = (matched.distance_km * 100.0).round() / 100.0;
        Self { nearest_branch: matched.branch, distance_km }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    pub email: Option<String>,
    /// Amount in major currency units. The engine converts to minor units.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub frontend_callback_origin: Option<String>,
}

impl InitiatePaymentRequest {
    pub fn into_intent(self) -> PaymentIntent {
        PaymentIntent {
            email: self.email,
            amount: self.amount,
            currency: self.currency,
            callback_origin: self.frontend_callback_origin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentParams {
    pub reference: Option<String>,
}

/// Body of a webhook acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub message: String,
}

impl WebhookAck {
    pub fn new<S: std::fmt::Display>(message: S) -> Self {
        Self { message: message.to_string() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distances_are_rounded_to_two_decimals_at_the_boundary() {
        let matched =
            NearestMatch { branch: Branch::new(1, "Ikeja Pharmacy", 6.6018, 3.3515), distance_km: 0.256_789 };
        let response = NearestBranchResponse::from(matched);
        assert_eq!(response.distance_km, 0.26);
    }

    #[test]
    fn response_fields_use_the_wire_naming() {
        let matched = NearestMatch { branch: Branch::new(1, "Ikeja Pharmacy", 6.6018, 3.3515), distance_km: 1.0 };
        let value = serde_json::to_value(NearestBranchResponse::from(matched)).unwrap();
        assert!(value.get("nearestBranch").is_some());
        assert!(value.get("distanceKm").is_some());
    }

    #[test]
    fn initiate_request_accepts_the_wire_naming() {
        let request: InitiatePaymentRequest = serde_json::from_str(
            r#"{"email": "ada@example.com", "amount": 10.0, "currency": "NGN", "frontendCallbackOrigin": "https://shop.example.com"}"#,
        )
        .unwrap();
        let intent = request.into_intent();
        assert_eq!(intent.callback_origin.as_deref(), Some("https://shop.example.com"));
    }
}
