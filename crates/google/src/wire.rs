//! JSON shapes of the Places Autocomplete and Place Details web services.

use serde::Deserialize;

use locus_core::types::{LatLng, PlaceDetails, PlacesStatus, Prediction};

#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    pub status: PlacesStatus,
    #[serde(default)]
    pub predictions: Vec<AutocompletePrediction>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AutocompletePrediction {
    pub place_id: String,
    #[serde(default)]
    pub description: String,
    pub structured_formatting: Option<StructuredFormatting>,
}

#[derive(Debug, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    pub secondary_text: Option<String>,
}

impl From<AutocompletePrediction> for Prediction {
    fn from(p: AutocompletePrediction) -> Self {
        let (main_text, secondary_text) = match p.structured_formatting {
            Some(f) => (f.main_text, f.secondary_text.unwrap_or_default()),
            None => (p.description, String::new()),
        };
        Prediction {
            place_id: p.place_id,
            main_text,
            secondary_text,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailsEnvelope {
    pub status: PlacesStatus,
    pub result: Option<PlaceRecord>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceRecord {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Option<LatLng>,
}

impl From<PlaceRecord> for PlaceDetails {
    fn from(r: PlaceRecord) -> Self {
        PlaceDetails {
            place_id: r.place_id,
            name: r.name,
            formatted_address: r.formatted_address,
            location: r.geometry.and_then(|g| g.location),
        }
    }
}
