use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use branch_payment_engine::{
    traits::{GeocoderError, PaymentProviderError},
    PaymentFlowError,
};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    /// Caller input was missing or malformed. The message is the response body's `error` field, verbatim.
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NoRecordFound(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An upstream dependency failed. Status {status}. {body}")]
    UpstreamError { status: u16, body: String },
    #[error("An upstream dependency did not respond within {0}ms")]
    UpstreamTimeout(u64),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // The upstream body rides along verbatim so provider failures stay diagnosable from the outside.
            Self::UpstreamError { body, .. } => {
                json!({ "error": self.to_string(), "upstream": upstream_body(body) })
            },
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

/// Upstream error bodies are usually JSON; fall back to a plain string when they are not.
fn upstream_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

impl From<GeocoderError> for ServerError {
    fn from(e: GeocoderError) -> Self {
        match e {
            GeocoderError::EmptyAddress => Self::ValidationError("Address is required".to_string()),
            GeocoderError::NotFound(_) => Self::NoRecordFound(e.to_string()),
            GeocoderError::Upstream { status, body } => Self::UpstreamError { status, body },
            GeocoderError::Timeout(ms) => Self::UpstreamTimeout(ms),
            GeocoderError::Unreachable(_) | GeocoderError::InvalidResponse(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<PaymentProviderError> for ServerError {
    fn from(e: PaymentProviderError) -> Self {
        match e {
            PaymentProviderError::Upstream { status, body } => Self::UpstreamError { status, body },
            PaymentProviderError::Timeout(ms) => Self::UpstreamTimeout(ms),
            PaymentProviderError::Unreachable(_)
            | PaymentProviderError::InvalidResponse(_)
            | PaymentProviderError::Initialization(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<PaymentFlowError> for ServerError {
    fn from(e: PaymentFlowError) -> Self {
        match e {
            PaymentFlowError::Validation(msg) => Self::ValidationError(msg),
            PaymentFlowError::Provider(e) => e.into(),
            PaymentFlowError::Store(e) => Self::BackendError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation_errors_render_as_bare_messages() {
        let err = ServerError::ValidationError("Address is required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Address is required");
    }

    #[test]
    fn upstream_bodies_are_attached_verbatim() {
        let err = ServerError::UpstreamError { status: 502, body: r#"{"status":false,"message":"nope"}"#.to_string() };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeouts_map_to_gateway_timeout() {
        let err: ServerError = GeocoderError::Timeout(10_000).into();
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn geocoder_misses_map_to_not_found() {
        let err: ServerError = GeocoderError::NotFound("Atlantis".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
