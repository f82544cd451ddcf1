//! HTTP client for the Places web services.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use locus_core::client::{
    DetailsRequest, DetailsResponse, PlacesClient, PlacesLoader, PredictionRequest,
    PredictionsResponse,
};
use locus_core::types::PlacesStatus;
use locus_core::{PlacesError, SearchConfig};

use crate::wire::{AutocompleteResponse, DetailsEnvelope};

const AUTOCOMPLETE_PATH: &str = "maps/api/place/autocomplete/json";
const DETAILS_PATH: &str = "maps/api/place/details/json";

/// Parse an endpoint so that relative joins append to its path.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, PlacesError> {
    let normalized = format!("{}/", endpoint.trim_end_matches('/'));
    let url = Url::parse(&normalized).map_err(|_| PlacesError::InvalidEndpoint(endpoint.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(PlacesError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(url)
}

pub struct GooglePlacesClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(http: reqwest::Client, endpoint: &str, api_key: impl Into<String>) -> Result<Self, PlacesError> {
        Ok(Self {
            http,
            endpoint: parse_endpoint(endpoint)?,
            api_key: api_key.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, PlacesError> {
        let url = self
            .endpoint
            .join(path)
            .map_err(|_| PlacesError::InvalidEndpoint(self.endpoint.to_string()))?;

        // The key travels in the query string; keep it out of error messages.
        let resp = self
            .http
            .get(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PlacesError::Http(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PlacesError::Http(format!("{path} returned HTTP {status}")));
        }

        let body = resp.bytes().await.map_err(|e| PlacesError::Http(e.without_url().to_string()))?;
        serde_json::from_slice(&body).map_err(|e| PlacesError::Decode(e.to_string()))
    }
}

fn log_rejection(operation: &str, status: PlacesStatus, message: Option<&str>) {
    match status {
        PlacesStatus::Ok | PlacesStatus::ZeroResults => {}
        _ => warn!(operation, status = ?status, message = message.unwrap_or(""), "Places request rejected"),
    }
}

#[async_trait]
impl PlacesClient for GooglePlacesClient {
    async fn predictions(&self, request: &PredictionRequest) -> Result<PredictionsResponse, PlacesError> {
        let types = request.types.join("|");
        let mut query = vec![("input", request.input.as_str())];
        if !types.is_empty() {
            query.push(("types", types.as_str()));
        }

        let resp: AutocompleteResponse = self.get_json(AUTOCOMPLETE_PATH, &query).await?;
        log_rejection("autocomplete", resp.status, resp.error_message.as_deref());
        debug!(input = %request.input, status = ?resp.status, count = resp.predictions.len(), "Autocomplete response");

        Ok(PredictionsResponse {
            status: resp.status,
            predictions: resp.predictions.into_iter().map(Into::into).collect(),
        })
    }

    async fn details(&self, request: &DetailsRequest) -> Result<DetailsResponse, PlacesError> {
        let fields = request.fields.join(",");
        let query = [("place_id", request.place_id.as_str()), ("fields", fields.as_str())];

        let resp: DetailsEnvelope = self.get_json(DETAILS_PATH, &query).await?;
        log_rejection("details", resp.status, resp.error_message.as_deref());
        debug!(place_id = %request.place_id, status = ?resp.status, "Details response");

        Ok(DetailsResponse {
            status: resp.status,
            place: resp.result.map(Into::into),
        })
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Builds a [`GooglePlacesClient`] for the controller's API key.
#[derive(Debug, Clone)]
pub struct GoogleLoader {
    endpoint: String,
    timeout: Option<Duration>,
}

impl GoogleLoader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), timeout: None }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Build a client synchronously, for callers that bypass the controller.
    pub fn build(&self, api_key: &str) -> Result<GooglePlacesClient, PlacesError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!("locus/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| PlacesError::Http(e.to_string()))?;
        GooglePlacesClient::new(http, &self.endpoint, api_key)
    }
}

#[async_trait]
impl PlacesLoader for GoogleLoader {
    async fn load(&self, api_key: &str) -> Result<Arc<dyn PlacesClient>, PlacesError> {
        let client = self.build(api_key)?;
        debug!(endpoint = %client.endpoint, "Places client built");
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_append_to_path() {
        let base = parse_endpoint("http://127.0.0.1:8080/proxy").unwrap();
        assert_eq!(
            base.join(AUTOCOMPLETE_PATH).unwrap().as_str(),
            "http://127.0.0.1:8080/proxy/maps/api/place/autocomplete/json"
        );
        let base = parse_endpoint("https://maps.googleapis.com/").unwrap();
        assert_eq!(
            base.join(DETAILS_PATH).unwrap().as_str(),
            "https://maps.googleapis.com/maps/api/place/details/json"
        );
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(matches!(parse_endpoint("not a url"), Err(PlacesError::InvalidEndpoint(_))));
        assert!(matches!(parse_endpoint("ftp://example.com"), Err(PlacesError::InvalidEndpoint(_))));
    }
}
