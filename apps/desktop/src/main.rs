//! Locus Desktop — location search with live autocomplete.

use dioxus::prelude::*;

mod app;
mod search;
mod state;

use app::App;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locus=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    // Config is read once, before the runtime starts.
    let _ = state::CONFIG.set(locus_core::load_config(None));

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

        LaunchBuilder::new()
            .with_cfg(
                Config::default()
                    .with_menu(None)
                    .with_background_color((10, 10, 10, 255))
                    .with_disable_context_menu(true)
                    .with_window(
                        WindowBuilder::new()
                            .with_title("Locus")
                            .with_inner_size(LogicalSize::new(720.0, 640.0))
                            .with_min_inner_size(LogicalSize::new(420.0, 360.0))
                            .with_resizable(true)
                            .with_decorations(true),
                    ),
            )
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        dioxus::launch(App);
    }
}
