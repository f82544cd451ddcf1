//! Search bar component wired to a [`SearchController`].
//!
//! The controller owns all search state; this component mirrors its watch
//! channel into a signal and forwards DOM events back to it.

use std::sync::Arc;

use dioxus::prelude::*;
use tokio::sync::mpsc;
use tracing::debug;

use locus_core::navigate::BrowserNavigator;
use locus_core::notify::ChannelSink;
use locus_core::types::{Availability, PlaceResult, PointerTarget, SearchState};
use locus_core::SearchController;
use locus_google::GoogleLoader;

use crate::state::{app_config, push_toast};

/// Autocomplete search box.
///
/// With `on_select`, resolved places are handed to the parent; without it the
/// app navigates to the place's map page.
#[component]
pub fn SearchBar(on_select: Option<EventHandler<PlaceResult>>) -> Element {
    let mut state = use_signal(SearchState::default);

    let controller = use_hook(move || {
        let config = app_config();
        let (sink, mut notifications) = ChannelSink::new();
        // Controller callbacks run off the UI thread; selections come back through a channel.
        let (picked_tx, mut picked) = mpsc::unbounded_channel::<PlaceResult>();

        let builder = SearchController::builder(config.clone()).notifier(Arc::new(sink));
        let builder = if on_select.is_some() {
            builder.on_select(move |place| {
                let _ = picked_tx.send(place.clone());
            })
        } else {
            builder.navigator(Arc::new(BrowserNavigator::new(config.app_url.clone())))
        };
        let controller = builder.mount(Arc::new(GoogleLoader::from_config(&config)));

        let mut updates = controller.subscribe();
        spawn(async move {
            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            debug!("Search controller dropped, stopping state sync");
                            break;
                        }
                        let next = updates.borrow_and_update().clone();
                        state.set(next);
                    }
                    Some(n) = notifications.recv() => push_toast(n),
                    Some(place) = picked.recv() => {
                        if let Some(handler) = on_select {
                            handler.call(place);
                        }
                    }
                }
            }
        });

        controller
    });

    use_drop({
        let controller = controller.clone();
        move || controller.unmount()
    });

    let s = state.read();
    let panel_visible = s.is_panel_visible();
    let placeholder = match s.availability {
        Availability::Unavailable => "Search unavailable",
        _ => "Search for a location...",
    };

    let on_input = {
        let controller = controller.clone();
        move |e: Event<FormData>| controller.set_query(e.value())
    };
    let on_clear = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.clear()
    };
    let on_outside = {
        let controller = controller.clone();
        move |_: MouseEvent| controller.pointer_down(PointerTarget::Outside)
    };

    rsx! {
        // Catches pointer-downs anywhere outside the bar while the dropdown is open.
        if panel_visible {
            div { class: "search-backdrop", onmousedown: on_outside }
        }

        div {
            class: "search-bar",

            div {
                class: "search-input-row",
                svg {
                    class: "search-icon",
                    width: "16",
                    height: "16",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    circle { cx: "11", cy: "11", r: "8" }
                    line { x1: "21", y1: "21", x2: "16.65", y2: "16.65" }
                }
                input {
                    class: "search-input",
                    r#type: "text",
                    placeholder,
                    autofocus: true,
                    value: "{s.query}",
                    oninput: on_input,
                }
                if s.is_searching {
                    span { class: "search-spinner", title: "Searching" }
                } else if s.shows_clear_button() {
                    button {
                        class: "search-clear",
                        title: "Clear search",
                        onclick: on_clear,
                        "\u{00D7}"
                    }
                }
            }

            if panel_visible {
                ul {
                    class: "search-results",
                    for prediction in s.visible_predictions().iter() {
                        li {
                            key: "{prediction.place_id}",
                            class: "search-result",
                            onclick: {
                                let controller = controller.clone();
                                let place_id = prediction.place_id.clone();
                                move |_| {
                                    let controller = controller.clone();
                                    let place_id = place_id.clone();
                                    spawn(async move {
                                        controller.select(&place_id).await;
                                    });
                                }
                            },
                            div { class: "search-result-main", "{prediction.main_text}" }
                            div { class: "search-result-secondary", "{prediction.secondary_text}" }
                        }
                    }
                }
            }
        }
    }
}
