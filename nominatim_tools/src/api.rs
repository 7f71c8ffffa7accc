use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};

use crate::{NominatimApiError, NominatimConfig, Place};

/// Client for the Nominatim search API.
#[derive(Clone)]
pub struct NominatimApi {
    config: NominatimConfig,
    client: Arc<Client>,
}

impl NominatimApi {
    pub fn new(config: NominatimConfig) -> Result<Self, NominatimApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let tag = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| NominatimApiError::Initialization(e.to_string()))?;
        headers.insert(USER_AGENT, tag);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NominatimApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Search for places matching the free-text query, returning at most `limit` results.
    ///
    /// A single attempt is made. Failures surface immediately rather than being retried, since the caller is
    /// typically a user-facing request that should not wait for backoff cycles.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Place>, NominatimApiError> {
        let url = format!("{}/search", self.config.base_url);
        trace!("Sending search query for '{query}'");
        let limit = limit.to_string();
        let params = [("q", query), ("format", "json"), ("limit", limit.as_str())];
        let response = self.client.get(url).query(&params).send().await.map_err(|e| self.transport_error(e))?;
        if response.status().is_success() {
            trace!("Search query successful. {}", response.status());
            response.json::<Vec<Place>>().await.map_err(|e| NominatimApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| NominatimApiError::ResponseError(e.to_string()))?;
            Err(NominatimApiError::QueryError { status, message })
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> NominatimApiError {
        if e.is_timeout() {
            NominatimApiError::Timeout(self.config.timeout_ms)
        } else {
            NominatimApiError::ResponseError(e.to_string())
        }
    }
}
