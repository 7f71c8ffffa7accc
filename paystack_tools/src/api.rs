use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    data_objects::{ApiEnvelope, InitializeData, InitializeRequest, VerifyData},
    PaystackApiError,
    PaystackConfig,
};

/// Client for the Paystack transaction API.
#[derive(Clone)]
pub struct PaystackApi {
    config: PaystackConfig,
    client: Arc<Client>,
}

impl PaystackApi {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let mut auth = HeaderValue::from_str(&bearer).map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Create a provider-hosted checkout session for the given payment details.
    pub async fn initialize_transaction(
        &self,
        request: &InitializeRequest,
    ) -> Result<ApiEnvelope<InitializeData>, PaystackApiError> {
        debug!("Initializing a {} {} transaction", request.amount, request.currency);
        let result =
            self.rest_query::<ApiEnvelope<InitializeData>, _>(Method::POST, "/transaction/initialize", Some(request)).await?;
        info!("Transaction initialized with reference [{}]", result.data.reference);
        Ok(result)
    }

    /// Fetch the current state of the transaction identified by `reference`.
    ///
    /// This is a read-only call with no provider-side effects, so callers may poll it freely.
    pub async fn verify_transaction(&self, reference: &str) -> Result<ApiEnvelope<VerifyData>, PaystackApiError> {
        let path = format!("/transaction/verify/{reference}");
        debug!("Verifying transaction [{reference}]");
        let result = self.rest_query::<ApiEnvelope<VerifyData>, ()>(Method::GET, &path, None).await?;
        debug!("Transaction [{reference}] verification returned status '{}'", result.data.status);
        Ok(result)
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaystackApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PaystackApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaystackApiError::ResponseError(e.to_string()))?;
            Err(PaystackApiError::QueryError { status, message })
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> PaystackApiError {
        if e.is_timeout() {
            PaystackApiError::Timeout(self.config.timeout_ms)
        } else {
            PaystackApiError::ResponseError(e.to_string())
        }
    }
}
