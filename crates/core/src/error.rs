//! Error types for the Places clients and the search controller.

use thiserror::Error;

use crate::notify::{Notification, Severity};

/// Failure talking to a Places service. Service-level statuses such as
/// `ZERO_RESULTS` are not errors; they travel inside the response.
#[derive(Debug, Clone, Error)]
pub enum PlacesError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("request timed out")]
    Timeout,
}

/// Failures the controller reports to the user.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("maps API key is not configured")]
    MissingApiKey,
    #[error("failed to load maps API: {0}")]
    Load(#[source] PlacesError),
    #[error("unable to retrieve details for place {place_id}: {reason}")]
    Details { place_id: String, reason: String },
}

impl SearchError {
    /// The user-facing notification for this error.
    pub fn notification(&self) -> Notification {
        match self {
            SearchError::MissingApiKey => Notification::new(
                "API Key Missing",
                "Google Maps API key is not configured",
                Severity::Error,
            ),
            SearchError::Load(_) => Notification::new(
                "Google Maps Load Error",
                "Failed to load Google Maps API",
                Severity::Error,
            ),
            SearchError::Details { .. } => Notification::new(
                "Details Error",
                "Unable to retrieve place details",
                Severity::Error,
            ),
        }
    }
}
