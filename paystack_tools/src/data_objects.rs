use bpg_common::Kobo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The response envelope every Paystack endpoint wraps its payload in.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

/// Request body for the transaction initialize endpoint. Amounts are in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeRequest {
    pub email: String,
    pub amount: Kobo,
    pub currency: String,
    pub callback_url: String,
}

/// The checkout handle returned by the initialize endpoint. `reference` is the correlation key for every
/// subsequent verification call and webhook notification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InitializeData {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Transaction details returned by the verify endpoint.
///
/// Only the fields the gateway consumes are typed; everything else Paystack sends is preserved in `extra` so the
/// payload can be mirrored back to clients without loss.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyData {
    pub status: String,
    pub reference: String,
    pub amount: Kobo,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub gateway_response: String,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Value,
}

/// Webhook notification body. Paystack posts `{event, data}` where `data` carries the transaction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookData {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(flatten)]
    pub extra: Value,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verify_payload_round_trips_unknown_fields() {
        let raw = r#"{
            "status": "success",
            "reference": "ref_8xk2",
            "amount": 1000,
            "currency": "NGN",
            "gateway_response": "Successful",
            "paid_at": "2024-05-01T10:30:00Z",
            "channel": "card",
            "fees": 15
        }"#;
        let data: VerifyData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.status, "success");
        assert_eq!(data.amount, Kobo::from(1000));
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["channel"], "card");
        assert_eq!(value["fees"], 15);
    }

    #[test]
    fn webhook_reference_is_optional() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"event": "charge.success", "data": {"id": 12345}}"#).unwrap();
        assert_eq!(event.event, "charge.success");
        assert!(event.data.reference.is_none());
    }
}
