//! Search controller — the state machine behind the location search widget.
//!
//! ```text
//! Idle ──keystroke──▶ Debouncing ──quiet period──▶ Fetching ──▶ ResultsOpen | Idle
//!   ▲                    │ keystroke: cancel + re-arm                │
//!   └──── clear / outside click / selection (Resolved) ◀─────────────┘
//! ```
//!
//! The controller is headless: front-ends feed it keystrokes, clicks and
//! selections, and render whatever [`SearchState`] it publishes through a
//! `tokio::sync::watch` channel. The Places client, the notification sink, the
//! navigator and the selection handler are all injected.
//!
//! Every query change, clear, selection and unmount bumps a generation counter
//! under the state lock; a prediction fetch applies its result only if its
//! generation is still the latest, so a slow response for an old query never
//! overwrites a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{DetailsRequest, PlacesClient, PlacesLoader, PredictionRequest};
use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::error::{PlacesError, SearchError};
use crate::navigate::{location_path, Navigator, TracingNavigator};
use crate::notify::{NotificationSink, TracingSink};
use crate::types::{Availability, PlaceResult, PointerTarget, SearchState};

/// Caller-supplied reaction to a resolved selection.
pub type SelectionHandler = Arc<dyn Fn(&PlaceResult) + Send + Sync>;

/// How often [`SearchController::settled`] re-checks the debounce timer.
const SETTLE_POLL: Duration = Duration::from_millis(20);

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct SearchControllerBuilder {
    config: SearchConfig,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    on_select: Option<SelectionHandler>,
}

impl SearchControllerBuilder {
    pub fn notifier(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifier = sink;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Handle resolved selections instead of navigating.
    pub fn on_select<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PlaceResult) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(handler));
        self
    }

    /// Create the controller and start loading the client in the background.
    ///
    /// Without an API key the loader is never called: a configuration error is
    /// reported once and the controller stays a plain text box. Must be called
    /// from within a tokio runtime.
    pub fn mount(self, loader: Arc<dyn PlacesLoader>) -> SearchController {
        let debouncer = Debouncer::new(self.config.debounce);
        let inner = Arc::new(Inner {
            config: self.config,
            notifier: self.notifier,
            navigator: self.navigator,
            on_select: self.on_select,
            client: RwLock::new(None),
            state: watch::Sender::new(SearchState::default()),
            debouncer,
            generation: AtomicU64::new(0),
            unmounted: AtomicBool::new(false),
            load_task: Mutex::new(None),
        });

        match inner.config.api_key() {
            None => {
                inner.report(SearchError::MissingApiKey);
                inner.state.send_modify(|s| s.availability = Availability::Unavailable);
            }
            Some(key) => {
                let key = key.to_string();
                let weak = Arc::downgrade(&inner);
                let task = tokio::spawn(async move {
                    let result = loader.load(&key).await;
                    if let Some(inner) = weak.upgrade() {
                        inner.finish_load(result);
                    }
                });
                *inner.load_task.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
            }
        }

        SearchController { inner }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Handle to one mounted search widget. Cheap to clone; all clones drive the
/// same state.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    config: SearchConfig,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    on_select: Option<SelectionHandler>,
    client: RwLock<Option<Arc<dyn PlacesClient>>>,
    state: watch::Sender<SearchState>,
    debouncer: Debouncer,
    /// Only mutated while holding the state lock, as is the debounce timer.
    generation: AtomicU64,
    unmounted: AtomicBool,
    load_task: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn builder(config: SearchConfig) -> SearchControllerBuilder {
        SearchControllerBuilder {
            config,
            notifier: Arc::new(TracingSink),
            navigator: Arc::new(TracingNavigator),
            on_select: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    /// Current state.
    pub fn snapshot(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.client().is_some()
    }

    /// Wait for loading to finish. Returns whether a client is available.
    pub async fn ready(&self) -> bool {
        let mut rx = self.subscribe();
        let ready = rx
            .wait_for(|s| s.availability != Availability::Loading)
            .await
            .map(|s| s.availability == Availability::Ready)
            .unwrap_or(false);
        ready
    }

    /// Wait until no debounce timer is armed and no prediction fetch is running.
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        loop {
            if !self.inner.debouncer.is_active() && !rx.borrow_and_update().is_searching {
                return;
            }
            tokio::select! {
                _ = rx.changed() => {}
                _ = tokio::time::sleep(SETTLE_POLL) => {}
            }
        }
    }

    /// The user edited the query.
    pub fn set_query(&self, query: impl Into<String>) {
        let inner = &self.inner;
        if inner.is_unmounted() {
            return;
        }
        let query = query.into();
        let client = inner.client().filter(|_| !query.trim().is_empty());

        // Bumping the generation and re-arming the timer must not interleave
        // with another caller, or the newest query could lose its timer.
        inner.state.send_modify(|s| {
            let generation = inner.bump_generation();
            s.query = query.clone();
            match &client {
                Some(client) => {
                    let weak = Arc::downgrade(inner);
                    let client = client.clone();
                    let input = query.clone();
                    inner.debouncer.schedule(async move {
                        if let Some(inner) = weak.upgrade() {
                            inner.fetch_predictions(generation, client, input).await;
                        }
                    });
                }
                None => {
                    inner.debouncer.cancel();
                    s.predictions.clear();
                    s.results_open = false;
                    s.is_searching = false;
                }
            }
        });
    }

    /// Resolve the prediction with `place_id`. No-op until the client is ready.
    ///
    /// On success the selection handler (or the navigator) is invoked, the query
    /// becomes the place name and the panel closes. On failure one details error
    /// is reported and the state is left as it was.
    pub async fn select(&self, place_id: &str) -> Option<PlaceResult> {
        self.inner.select(place_id).await
    }

    /// Select the prediction at `index` among those currently displayed.
    pub async fn select_at(&self, index: usize) -> Option<PlaceResult> {
        let place_id = {
            let state = self.inner.state.borrow();
            state.visible_predictions().get(index).map(|p| p.place_id.clone())
        }?;
        self.inner.select(&place_id).await
    }

    /// Reset query, predictions and panel. No network call.
    pub fn clear(&self) {
        let inner = &self.inner;
        inner.state.send_modify(|s| {
            inner.bump_generation();
            inner.debouncer.cancel();
            s.query.clear();
            s.predictions.clear();
            s.results_open = false;
            s.is_searching = false;
        });
    }

    /// A pointer-down anywhere on the page. Outside the widget it closes the
    /// panel; query and predictions are kept.
    pub fn pointer_down(&self, target: PointerTarget) {
        if target == PointerTarget::Inside {
            return;
        }
        self.inner.state.send_if_modified(|s| std::mem::replace(&mut s.results_open, false));
    }

    /// Tear down: cancel the pending timer and any in-progress load. Later
    /// completions are discarded and further input is ignored.
    pub fn unmount(&self) {
        let inner = &self.inner;
        inner.unmounted.store(true, Ordering::SeqCst);
        inner.debouncer.cancel();
        inner.abort_load();
        inner.state.send_modify(|s| {
            inner.bump_generation();
            s.is_searching = false;
            if s.availability == Availability::Loading {
                s.availability = Availability::Unavailable;
            }
        });
        debug!("Search controller unmounted");
    }
}

impl Inner {
    fn client(&self) -> Option<Arc<dyn PlacesClient>> {
        self.client.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn report(&self, err: SearchError) {
        warn!(error = %err, "Search widget error");
        self.notifier.notify(err.notification());
    }

    fn abort_load(&self) {
        if let Some(task) = self.load_task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            task.abort();
        }
    }

    fn finish_load(&self, result: Result<Arc<dyn PlacesClient>, PlacesError>) {
        if self.is_unmounted() {
            return;
        }
        match result {
            Ok(client) => {
                *self.client.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
                self.state.send_modify(|s| s.availability = Availability::Ready);
                info!("Places client ready");
            }
            Err(e) => {
                self.report(SearchError::Load(e));
                self.state.send_modify(|s| s.availability = Availability::Unavailable);
            }
        }
    }

    /// Apply the request timeout, if any, to a service call.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T, PlacesError>>) -> Result<T, PlacesError> {
        match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or(Err(PlacesError::Timeout)),
            None => call.await,
        }
    }

    async fn fetch_predictions(&self, generation: u64, client: Arc<dyn PlacesClient>, input: String) {
        let started = self.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            s.is_searching = true;
            true
        });
        if !started {
            return;
        }

        let request = PredictionRequest { input, types: self.config.place_types.clone() };
        debug!(input = %request.input, "Fetching predictions");
        let outcome = self.bounded(client.predictions(&request)).await;

        let predictions = match outcome {
            Ok(resp) if resp.status.is_ok() && !resp.predictions.is_empty() => resp.predictions,
            Ok(resp) => {
                debug!(input = %request.input, status = ?resp.status, "No predictions");
                Vec::new()
            }
            Err(e) => {
                warn!(input = %request.input, error = %e, "Prediction fetch failed");
                Vec::new()
            }
        };

        let count = predictions.len();
        let applied = self.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            s.results_open = !predictions.is_empty();
            s.predictions = predictions;
            s.is_searching = false;
            true
        });
        if applied {
            debug!(input = %request.input, count, "Predictions applied");
        } else {
            debug!(input = %request.input, "Discarding stale predictions");
        }
    }

    async fn select(&self, place_id: &str) -> Option<PlaceResult> {
        if self.is_unmounted() {
            return None;
        }
        let client = self.client()?;

        debug!(place_id, "Fetching place details");
        let request = DetailsRequest::for_selection(place_id);
        let resolved = match self.bounded(client.details(&request)).await {
            Ok(resp) if resp.status.is_ok() => resp
                .place
                .and_then(PlaceResult::from_details)
                .ok_or_else(|| "response has no location".to_string()),
            Ok(resp) => Err(format!("service returned {:?}", resp.status)),
            Err(e) => Err(e.to_string()),
        };

        if self.is_unmounted() {
            return None;
        }

        let place = match resolved {
            Ok(place) => place,
            Err(reason) => {
                self.report(SearchError::Details { place_id: place_id.to_string(), reason });
                return None;
            }
        };

        match &self.on_select {
            Some(handler) => handler(&place),
            None => self.navigator.navigate(&location_path(place.location)),
        }

        self.state.send_modify(|s| {
            self.bump_generation();
            self.debouncer.cancel();
            s.query = place.name.clone();
            s.results_open = false;
            s.is_searching = false;
        });
        info!(name = %place.name, location = %place.location, "Place selected");
        Some(place)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.abort_load();
    }
}
