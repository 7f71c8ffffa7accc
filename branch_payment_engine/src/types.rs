use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use bpg_common::Kobo;

//--------------------------------------     Coordinates       -------------------------------------------------------
/// A point on the globe, in degrees. Produced by the geocoder and discarded once a request completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinatesError(format!("latitude {lat} is outside [-90, 90]")));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinatesError(format!("longitude {lon} is outside [-180, 180]")));
        }
        Ok(Self { lat, lon })
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid coordinates: {0}")]
pub struct CoordinatesError(pub String);

//--------------------------------------     Branch       ------------------------------------------------------------
/// A single entry in the fixed branch registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Branch {
    pub fn new(id: i64, name: &str, lat: f64, lon: f64) -> Self {
        Self { id, name: name.to_string(), lat, lon }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// The branch closest to a query point, along with the geodesic distance to it.
///
/// `distance_km` is kept at full precision here; rounding for presentation happens at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    pub branch: Branch,
    pub distance_km: f64,
}

//--------------------------------------     PaymentIntent       -----------------------------------------------------
/// Caller-supplied details for a new payment, exactly as received.
///
/// Fields are optional because validation is the initiator's job: it rejects the intent with a field-specific
/// message rather than letting deserialization produce a generic error. The intent is forwarded to the provider
/// and then discarded; the engine holds no record of it afterwards.
#[derive(Debug, Clone, Default)]
pub struct PaymentIntent {
    pub email: Option<String>,
    /// Amount in major currency units (e.g. naira). Converted to minor units exactly once, by the initiator.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    /// Origin the provider redirects the end user to after checkout. The engine appends a fixed path and does NOT
    /// validate or allowlist the origin; deployments are expected to do that in front of this API.
    pub callback_origin: Option<String>,
}

/// A validated, provider-ready checkout request. Amounts are in minor units.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub email: String,
    pub amount: Kobo,
    pub currency: String,
    pub callback_url: String,
}

/// The provider's answer to an initialize call.
///
/// `raw` preserves the provider's response envelope verbatim so the HTTP layer can relay it to the caller
/// unchanged.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub reference: String,
    pub raw: Value,
}

//--------------------------------------     Verification       ------------------------------------------------------
/// Provider-reported transaction status, normalized from the provider's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifiedStatus {
    Success,
    Pending,
    Failed,
    /// A status string this gateway does not recognise. Preserved verbatim for diagnosability.
    Other(String),
}

impl VerifiedStatus {
    pub fn from_provider(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "pending" | "ongoing" | "processing" | "queued" => Self::Pending,
            "failed" | "abandoned" | "reversed" => Self::Failed,
            _ => Self::Other(status.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Display for VerifiedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VerifiedStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VerifiedStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_provider(&s))
    }
}

/// The result of one verification call against the provider.
///
/// Both confirmation channels compute their own outcome for the same reference, potentially concurrently.
/// `raw` carries the provider's transaction payload for relay to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: VerifiedStatus,
    pub message: String,
    pub raw: Value,
}

impl VerificationOutcome {
    pub fn new(status: VerifiedStatus, message: &str, raw: Value) -> Self {
        Self { status, message: message.to_string(), raw }
    }
}

//--------------------------------------     TransactionState       --------------------------------------------------
/// Per-reference reconciliation state.
///
/// The only legal transitions are `Unverified → FinalizedSuccess` and `Unverified → FinalizedOther`; both targets
/// are terminal. A `Pending` verification outcome leaves the state `Unverified`, since the provider can still move
/// a pending transaction to success later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionState {
    #[default]
    Unverified,
    FinalizedSuccess,
    FinalizedOther,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unverified)
    }
}

impl Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unverified => "unverified",
            Self::FinalizedSuccess => "finalized-success",
            Self::FinalizedOther => "finalized-other",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coordinates_must_lie_on_the_globe() {
        assert!(Coordinates::new(6.6018, 3.3515).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn provider_statuses_are_normalized() {
        assert_eq!(VerifiedStatus::from_provider("success"), VerifiedStatus::Success);
        assert_eq!(VerifiedStatus::from_provider("Abandoned"), VerifiedStatus::Failed);
        assert_eq!(VerifiedStatus::from_provider("ongoing"), VerifiedStatus::Pending);
        assert_eq!(VerifiedStatus::from_provider("paused"), VerifiedStatus::Other("paused".to_string()));
    }

    #[test]
    fn verify_idempotence_holds_for_equal_provider_state() {
        let a = VerifiedStatus::from_provider("success");
        let b = VerifiedStatus::from_provider("success");
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn only_finalized_states_are_terminal() {
        assert!(!TransactionState::Unverified.is_terminal());
        assert!(TransactionState::FinalizedSuccess.is_terminal());
        assert!(TransactionState::FinalizedOther.is_terminal());
    }
}
