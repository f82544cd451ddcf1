//! Domain types shared by the controller, the provider clients and the front-ends:
//! coordinates, predictions, resolved places, service status codes and the
//! observable search state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for a resolved place the service returned without a name.
pub const UNNAMED_PLACE: &str = "Unnamed Place";

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

// ---------------------------------------------------------------------------
// Service records
// ---------------------------------------------------------------------------

/// Status code attached to every Places response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    NotFound,
    UnknownError,
    /// Any status string this crate does not know about.
    #[serde(other)]
    Other,
}

impl PlacesStatus {
    pub fn is_ok(self) -> bool {
        self == PlacesStatus::Ok
    }
}

/// A candidate place suggested for a partial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Opaque service identifier, stable for the place.
    pub place_id: String,
    pub main_text: String,
    pub secondary_text: String,
}

/// Detail record for one place identifier. Every field is optional because the
/// service only returns the fields that were requested and known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
}

/// A resolved selection handed to the selection handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: LatLng,
}

impl PlaceResult {
    /// Build a result from a detail record. Returns `None` when the record has
    /// no location, which callers treat as a failed lookup.
    pub fn from_details(details: PlaceDetails) -> Option<Self> {
        let location = details.location?;
        Some(Self {
            id: details.place_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: details.name.unwrap_or_else(|| UNNAMED_PLACE.to_string()),
            address: details.formatted_address.unwrap_or_default(),
            location,
        })
    }
}

// ---------------------------------------------------------------------------
// Widget state
// ---------------------------------------------------------------------------

/// Whether the controller has a usable client handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Loading,
    Ready,
    /// Missing credential or failed load. Permanent for the controller's lifetime.
    Unavailable,
}

/// Where a pointer-down landed relative to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Inside,
    Outside,
}

/// Observable state of one search widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    /// Predictions for the current query, in service response order.
    pub predictions: Vec<Prediction>,
    pub is_searching: bool,
    pub results_open: bool,
    pub availability: Availability,
}

impl SearchState {
    /// The dropdown is shown only for a non-blank query with at least one
    /// prediction, while the panel is open.
    pub fn is_panel_visible(&self) -> bool {
        self.results_open && !self.query.trim().is_empty() && !self.predictions.is_empty()
    }

    /// The clear button takes the spinner's place once no fetch is running.
    pub fn shows_clear_button(&self) -> bool {
        !self.is_searching && !self.query.is_empty()
    }

    /// Predictions actually on screen.
    pub fn visible_predictions(&self) -> &[Prediction] {
        if self.is_panel_visible() {
            &self.predictions
        } else {
            &[]
        }
    }
}
