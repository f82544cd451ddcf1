//! Test harness for controller integration tests.
//!
//! Mounts a `SearchController` against scripted in-memory collaborators: a fake
//! Places client whose responses (and latencies) are set per input, a loader
//! that hands it out, and sinks that record notifications and navigations.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use locus_core::client::{
    DetailsRequest, DetailsResponse, PlacesClient, PlacesLoader, PredictionRequest,
    PredictionsResponse,
};
use locus_core::notify::{Notification, NotificationSink};
use locus_core::types::{LatLng, PlaceDetails, PlaceResult, PlacesStatus, Prediction};
use locus_core::{Navigator, PlacesError, SearchConfig, SearchController};

// ---------------------------------------------------------------------------
// Fake Places client
// ---------------------------------------------------------------------------

struct Scripted<T> {
    delay: Duration,
    result: Result<T, PlacesError>,
}

#[derive(Default)]
pub struct FakePlaces {
    predictions: Mutex<HashMap<String, Scripted<PredictionsResponse>>>,
    details: Mutex<HashMap<String, Scripted<DetailsResponse>>>,
    pub prediction_requests: Mutex<Vec<PredictionRequest>>,
    pub detail_requests: Mutex<Vec<DetailsRequest>>,
}

pub fn prediction(id: &str, main: &str, secondary: &str) -> Prediction {
    Prediction {
        place_id: id.into(),
        main_text: main.into(),
        secondary_text: secondary.into(),
    }
}

impl FakePlaces {
    pub fn new() -> Self {
        Self::default()
    }

    fn script_predictions(
        self,
        input: &str,
        delay: Duration,
        result: Result<PredictionsResponse, PlacesError>,
    ) -> Self {
        self.predictions.lock().unwrap().insert(input.into(), Scripted { delay, result });
        self
    }

    fn script_details(
        self,
        place_id: &str,
        delay: Duration,
        result: Result<DetailsResponse, PlacesError>,
    ) -> Self {
        self.details.lock().unwrap().insert(place_id.into(), Scripted { delay, result });
        self
    }

    pub fn with_predictions(self, input: &str, predictions: Vec<Prediction>) -> Self {
        self.with_slow_predictions(input, Duration::ZERO, predictions)
    }

    pub fn with_slow_predictions(self, input: &str, delay: Duration, predictions: Vec<Prediction>) -> Self {
        let resp = PredictionsResponse { status: PlacesStatus::Ok, predictions };
        self.script_predictions(input, delay, Ok(resp))
    }

    pub fn with_prediction_status(self, input: &str, status: PlacesStatus) -> Self {
        let resp = PredictionsResponse { status, predictions: Vec::new() };
        self.script_predictions(input, Duration::ZERO, Ok(resp))
    }

    pub fn with_prediction_error(self, input: &str) -> Self {
        self.script_predictions(input, Duration::ZERO, Err(PlacesError::Http("connection reset".into())))
    }

    /// Predictions for `input` never arrive within any realistic timeout.
    pub fn with_hanging_predictions(self, input: &str) -> Self {
        let resp = PredictionsResponse { status: PlacesStatus::Ok, predictions: Vec::new() };
        self.script_predictions(input, Duration::from_secs(3600), Ok(resp))
    }

    pub fn with_place(self, place_id: &str, name: &str, address: &str, location: LatLng) -> Self {
        let place = PlaceDetails {
            place_id: None,
            name: Some(name.into()),
            formatted_address: Some(address.into()),
            location: Some(location),
        };
        let resp = DetailsResponse { status: PlacesStatus::Ok, place: Some(place) };
        self.script_details(place_id, Duration::ZERO, Ok(resp))
    }

    pub fn with_place_without_geometry(self, place_id: &str) -> Self {
        let place = PlaceDetails { name: Some("Nowhere".into()), ..Default::default() };
        let resp = DetailsResponse { status: PlacesStatus::Ok, place: Some(place) };
        self.script_details(place_id, Duration::ZERO, Ok(resp))
    }

    pub fn with_details_status(self, place_id: &str, status: PlacesStatus) -> Self {
        let resp = DetailsResponse { status, place: None };
        self.script_details(place_id, Duration::ZERO, Ok(resp))
    }

    pub fn with_details_error(self, place_id: &str) -> Self {
        self.script_details(place_id, Duration::ZERO, Err(PlacesError::Http("connection reset".into())))
    }

    /// Details for `place_id` never arrive within any realistic timeout.
    pub fn with_hanging_details(self, place_id: &str) -> Self {
        let place = PlaceDetails {
            name: Some("Too Late".into()),
            location: Some(LatLng::new(0.0, 0.0)),
            ..Default::default()
        };
        let resp = DetailsResponse { status: PlacesStatus::Ok, place: Some(place) };
        self.script_details(place_id, Duration::from_secs(3600), Ok(resp))
    }

    pub fn prediction_inputs(&self) -> Vec<String> {
        self.prediction_requests.lock().unwrap().iter().map(|r| r.input.clone()).collect()
    }
}

#[async_trait]
impl PlacesClient for FakePlaces {
    async fn predictions(&self, request: &PredictionRequest) -> Result<PredictionsResponse, PlacesError> {
        self.prediction_requests.lock().unwrap().push(request.clone());
        let (delay, result) = match self.predictions.lock().unwrap().get(&request.input) {
            Some(s) => (s.delay, s.result.clone()),
            None => (
                Duration::ZERO,
                Ok(PredictionsResponse { status: PlacesStatus::ZeroResults, predictions: Vec::new() }),
            ),
        };
        tokio::time::sleep(delay).await;
        result
    }

    async fn details(&self, request: &DetailsRequest) -> Result<DetailsResponse, PlacesError> {
        self.detail_requests.lock().unwrap().push(request.clone());
        let (delay, result) = match self.details.lock().unwrap().get(&request.place_id) {
            Some(s) => (s.delay, s.result.clone()),
            None => (Duration::ZERO, Ok(DetailsResponse { status: PlacesStatus::NotFound, place: None })),
        };
        tokio::time::sleep(delay).await;
        result
    }
}

// ---------------------------------------------------------------------------
// Loader and recorders
// ---------------------------------------------------------------------------

pub struct FakeLoader {
    client: Option<Arc<FakePlaces>>,
    delay: Duration,
    pub calls: AtomicUsize,
    pub keys: Mutex<Vec<String>>,
}

impl FakeLoader {
    pub fn serving(client: Arc<FakePlaces>) -> Self {
        Self { client: Some(client), delay: Duration::ZERO, calls: AtomicUsize::new(0), keys: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { client: None, delay: Duration::ZERO, calls: AtomicUsize::new(0), keys: Mutex::new(Vec::new()) }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesLoader for FakeLoader {
    async fn load(&self, api_key: &str) -> Result<Arc<dyn PlacesClient>, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(api_key.to_string());
        tokio::time::sleep(self.delay).await;
        match &self.client {
            Some(client) => Ok(client.clone() as Arc<dyn PlacesClient>),
            None => Err(PlacesError::Http("script blocked".into())),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn titles(&self) -> Vec<String> {
        self.notifications.lock().unwrap().iter().map(|n| n.title.clone()).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub targets: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.targets.lock().unwrap().push(target.to_string());
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub controller: SearchController,
    pub places: Arc<FakePlaces>,
    pub loader: Arc<FakeLoader>,
    pub sink: Arc<RecordingSink>,
    pub navigator: Arc<RecordingNavigator>,
    /// Places passed to the selection handler, when one is installed.
    pub selected: Arc<Mutex<Vec<PlaceResult>>>,
}

pub fn test_config() -> SearchConfig {
    SearchConfig::default().with_api_key("test-key")
}

pub struct HarnessBuilder {
    config: SearchConfig,
    places: FakePlaces,
    handler: bool,
    failing_loader: bool,
    load_delay: Duration,
}

impl HarnessBuilder {
    pub fn new(places: FakePlaces) -> Self {
        Self { config: test_config(), places, handler: false, failing_loader: false, load_delay: Duration::ZERO }
    }

    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_handler(mut self) -> Self {
        self.handler = true;
        self
    }

    pub fn failing_loader(mut self) -> Self {
        self.failing_loader = true;
        self
    }

    pub fn load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Mount the controller without waiting for the loader.
    pub fn mount(self) -> Harness {
        let places = Arc::new(self.places);
        let loader = if self.failing_loader {
            FakeLoader::failing()
        } else {
            FakeLoader::serving(places.clone())
        };
        let loader = Arc::new(loader.slow(self.load_delay));
        let sink = Arc::new(RecordingSink::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let selected = Arc::new(Mutex::new(Vec::new()));

        let mut builder = SearchController::builder(self.config)
            .notifier(sink.clone())
            .navigator(navigator.clone());
        if self.handler {
            let selected = selected.clone();
            builder = builder.on_select(move |place| selected.lock().unwrap().push(place.clone()));
        }
        let controller = builder.mount(loader.clone());

        Harness { controller, places, loader, sink, navigator, selected }
    }

    /// Mount and wait for loading to finish.
    pub async fn ready(self) -> Harness {
        let harness = self.mount();
        harness.controller.ready().await;
        harness
    }
}

impl Harness {
    /// Type a query and wait for the debounced fetch to complete.
    pub async fn type_query(&self, query: &str) {
        self.controller.set_query(query);
        self.controller.settled().await;
    }
}
