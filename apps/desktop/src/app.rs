//! Root application component.

use dioxus::prelude::*;

use locus_core::notify::Severity;
use locus_core::types::PlaceResult;

use crate::search::SearchBar;
use crate::state::*;

static VARIABLES_CSS: Asset = asset!("/assets/styles/variables.css");
static APP_CSS: Asset = asset!("/assets/styles/app.css");

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: VARIABLES_CSS }
        document::Stylesheet { href: APP_CSS }

        div {
            class: "app-shell",

            div {
                class: "titlebar",
                span { class: "titlebar-title", "Locus" }
            }

            div {
                class: "content-area",
                SearchBar {
                    on_select: move |place: PlaceResult| {
                        *SELECTED_PLACE.write() = Some(place);
                    },
                }
                PlacePanel {}
            }

            Toaster {}
        }
    }
}

/// The last place picked from the search bar.
#[component]
fn PlacePanel() -> Element {
    let selected = SELECTED_PLACE.read();

    let Some(place) = selected.as_ref() else {
        return rsx! {
            div {
                class: "place-empty",
                span { "Search for a place to see it here" }
            }
        };
    };

    rsx! {
        div {
            class: "place-panel",
            h2 { class: "place-name", "{place.name}" }
            div { class: "place-address", "{place.address}" }
            div {
                class: "place-coords",
                span { class: "place-label", "Location" }
                span { "{place.location}" }
            }
            div {
                class: "place-id",
                span { class: "place-label", "Id" }
                span { "{place.id}" }
            }
        }
    }
}

#[component]
fn Toaster() -> Element {
    let toasts = TOASTS.read();

    rsx! {
        div {
            class: "toaster",
            for toast in toasts.iter() {
                div {
                    key: "{toast.id}",
                    class: match toast.severity {
                        Severity::Error => "toast destructive",
                        Severity::Warning => "toast warning",
                        Severity::Info => "toast",
                    },
                    onclick: {
                        let id = toast.id;
                        move |_| dismiss_toast(id)
                    },
                    div { class: "toast-title", "{toast.title}" }
                    div { class: "toast-description", "{toast.description}" }
                }
            }
        }
    }
}
