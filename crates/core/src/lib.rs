//! Locus — headless location search autocomplete.
//!
//! This crate holds everything the search widget needs that is not tied to a
//! particular UI or mapping provider: the controller state machine, the domain
//! types, the traits for the collaborators the controller talks to, and the
//! configuration loader shared by the binaries.
//!
//! # Modules
//!
//! - [`controller`] — The search controller: query → debounce → predictions → selection
//! - [`types`] — Predictions, place records, coordinates, search state
//! - [`client`] — `PlacesLoader` / `PlacesClient` traits and their request/response types
//! - [`debounce`] — Cancel-and-rearm timer used for keystroke debouncing
//! - [`notify`] — Notification sink trait and the stock sinks
//! - [`navigate`] — Fallback navigation target and navigators
//! - [`config`] — `locus.toml` + environment configuration
//! - [`error`] — Client and controller error types

pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod navigate;
pub mod notify;
pub mod types;

pub use client::{PlacesClient, PlacesLoader};
pub use config::{load_config, SearchConfig};
pub use controller::{SearchController, SearchControllerBuilder};
pub use error::{PlacesError, SearchError};
pub use navigate::Navigator;
pub use notify::{Notification, NotificationSink, Severity};
pub use types::{LatLng, PlaceResult, PointerTarget, Prediction, SearchState};
