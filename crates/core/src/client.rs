//! The mapping service as the controller sees it.
//!
//! A [`PlacesLoader`] turns an API key into a ready [`PlacesClient`]; the client
//! answers prediction and detail lookups. Both are injected into the controller,
//! so tests substitute fakes and front-ends pick a provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PlacesError;
use crate::types::{PlaceDetails, PlacesStatus, Prediction};

/// Place types requested for autocomplete: addresses and businesses.
pub const DEFAULT_PLACE_TYPES: &[&str] = &["geocode", "establishment"];

/// Fields requested for a selected place.
pub const DETAIL_FIELDS: &[&str] = &["name", "geometry", "formatted_address"];

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub input: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsRequest {
    pub place_id: String,
    pub fields: Vec<String>,
}

impl DetailsRequest {
    /// Request the fields the widget needs to resolve a selection.
    pub fn for_selection(place_id: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            fields: DETAIL_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionsResponse {
    pub status: PlacesStatus,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsResponse {
    pub status: PlacesStatus,
    pub place: Option<PlaceDetails>,
}

/// A loaded Places client.
#[async_trait]
pub trait PlacesClient: Send + Sync {
    /// Autocomplete predictions for a partial query.
    async fn predictions(&self, request: &PredictionRequest) -> Result<PredictionsResponse, PlacesError>;

    /// Detail record for one place identifier.
    async fn details(&self, request: &DetailsRequest) -> Result<DetailsResponse, PlacesError>;
}

/// Produces a client for an API key. Called once per controller mount.
#[async_trait]
pub trait PlacesLoader: Send + Sync {
    async fn load(&self, api_key: &str) -> Result<Arc<dyn PlacesClient>, PlacesError>;
}
