//! Fallback navigation when no selection handler is supplied: the widget sends
//! the user to the root page centred on the resolved coordinate.

use tracing::{info, warn};

use crate::types::LatLng;

/// Performs a full navigation to an app-relative target such as `/?lat=1&lng=2`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Root path with `lat` / `lng` query parameters in shortest round-trip decimals.
pub fn location_path(location: LatLng) -> String {
    format!("/?lat={}&lng={}", location.lat, location.lng)
}

/// Join an app base URL and an app-relative target.
pub fn join_url(base: &str, target: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), target)
}

/// Logs the navigation target. Default when a front-end has nowhere to go.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, target: &str) {
        info!(target_url = target, "Navigate");
    }
}

/// Opens the target in the system browser, relative to the app's base URL.
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    app_url: String,
}

impl BrowserNavigator {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self { app_url: app_url.into() }
    }

    pub fn url_for(&self, target: &str) -> String {
        join_url(&self.app_url, target)
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, target: &str) {
        let url = self.url_for(target);
        info!(url = %url, "Opening browser");
        if let Err(e) = open::that(&url) {
            warn!(url = %url, error = %e, "Failed to open browser");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_path_uses_shortest_decimals() {
        assert_eq!(location_path(LatLng::new(40.7128, -74.006)), "/?lat=40.7128&lng=-74.006");
        assert_eq!(location_path(LatLng::new(1.0, 0.5)), "/?lat=1&lng=0.5");
    }

    #[test]
    fn browser_url_joins_without_double_slash() {
        let nav = BrowserNavigator::new("http://localhost:3000/");
        assert_eq!(nav.url_for("/?lat=1&lng=2"), "http://localhost:3000/?lat=1&lng=2");
    }
}
