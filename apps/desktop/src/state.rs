//! Global application state using Dioxus signals.

use std::sync::OnceLock;
use std::time::Duration;

use dioxus::prelude::*;
use tracing::debug;
use locus_core::notify::{Notification, Severity};
use locus_core::types::PlaceResult;
use locus_core::SearchConfig;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Loaded before Dioxus launches, read by every search bar on mount.
pub static CONFIG: OnceLock<SearchConfig> = OnceLock::new();

pub fn app_config() -> SearchConfig {
    CONFIG.get().cloned().unwrap_or_default()
}

#[derive(Clone, PartialEq)]
pub struct Toast {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

// ---------------------------------------------------------------------------
// Global signals
// ---------------------------------------------------------------------------

/// Last place resolved from the search bar
pub static SELECTED_PLACE: GlobalSignal<Option<PlaceResult>> = Signal::global(|| None);

/// Toasts currently on screen, oldest first
pub static TOASTS: GlobalSignal<Vec<Toast>> = Signal::global(Vec::new);

/// Show a notification and schedule its removal.
pub fn push_toast(notification: Notification) {
    let id = uuid::Uuid::new_v4();
    debug!(%id, title = %notification.title, "Toast shown");
    TOASTS.write().push(Toast {
        id,
        title: notification.title,
        description: notification.description,
        severity: notification.severity,
    });
    spawn(async move {
        tokio::time::sleep(TOAST_TTL).await;
        TOASTS.write().retain(|t| t.id != id);
    });
}

pub fn dismiss_toast(id: uuid::Uuid) {
    TOASTS.write().retain(|t| t.id != id);
}
