//! Google Places provider for Locus.
//!
//! Implements the `locus-core` [`PlacesLoader`](locus_core::PlacesLoader) and
//! [`PlacesClient`](locus_core::PlacesClient) traits over the Places
//! Autocomplete and Place Details JSON web services.
//!
//! - [`client`] — `GooglePlacesClient` and `GoogleLoader`
//! - [`wire`] — Response JSON shapes and their conversion to core types

pub mod client;
pub mod wire;

pub use client::{GoogleLoader, GooglePlacesClient};
