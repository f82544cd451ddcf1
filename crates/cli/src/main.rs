//! Locus CLI — place search from the terminal.
//!
//! `search` and `details` call the Places service directly; `resolve` and
//! `interactive` drive the same search controller the desktop widget uses.

mod session;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use locus_core::client::{DetailsRequest, PlacesClient, PredictionRequest};
use locus_core::navigate::BrowserNavigator;
use locus_core::notify::{Notification, NotificationSink};
use locus_core::types::PlaceResult;
use locus_core::{load_config, SearchConfig, SearchController};
use locus_google::{GoogleLoader, GooglePlacesClient};

/// Locus CLI — location search backed by the Places service.
#[derive(Parser)]
#[command(name = "locus", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./locus.toml, then ~/.locus/locus.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List autocomplete predictions for a query
    Search {
        /// Partial place name or address
        query: String,
    },
    /// Resolve a place identifier to name, address and coordinate
    Details {
        /// Place identifier from `search`
        place_id: String,
    },
    /// Search, then resolve one of the predictions
    Resolve {
        /// Partial place name or address
        query: String,

        /// Which prediction to resolve (1 = first)
        #[arg(long, default_value = "1")]
        pick: usize,

        /// Open the map page for the place in the browser instead of printing it
        #[arg(long)]
        navigate: bool,
    },
    /// Interactive session: each line replaces the query, `:N` selects
    Interactive,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Prints notifications to stderr.
struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, n: Notification) {
        eprintln!("{}: {}", n.title, n.description);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn direct_client(config: &SearchConfig) -> GooglePlacesClient {
    let Some(key) = config.api_key() else {
        fail("No maps API key configured (set LOCUS_MAPS_API_KEY or api_key in locus.toml)");
    };
    GoogleLoader::from_config(config).build(key).unwrap_or_else(|e| fail(format!("Could not create client: {e}")))
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(format!("Could not encode JSON: {e}")),
    }
}

fn print_place(place: &PlaceResult, json: bool) {
    if json {
        print_json(place);
    } else {
        println!("Name:       {}", place.name);
        println!("Address:    {}", place.address);
        println!("Location:   {}", place.location);
        println!("Id:         {}", place.id);
    }
}

/// Mount a controller against the configured Google endpoint.
async fn mount(config: SearchConfig, navigate: bool) -> SearchController {
    let loader = Arc::new(GoogleLoader::from_config(&config));
    let mut builder = SearchController::builder(config.clone()).notifier(Arc::new(StderrSink));
    builder = if navigate {
        builder.navigator(Arc::new(BrowserNavigator::new(config.app_url.clone())))
    } else {
        builder.on_select(|place| debug!(name = %place.name, "Selected"))
    };
    let controller = builder.mount(loader);
    if !controller.ready().await {
        std::process::exit(1);
    }
    controller
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locus=warn".parse().unwrap()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Search { query } => {
            let client = direct_client(&config);
            let request = PredictionRequest { input: query.clone(), types: config.place_types.clone() };
            let resp = client
                .predictions(&request)
                .await
                .unwrap_or_else(|e| fail(format!("Search failed: {e}")));

            if cli.json {
                print_json(&resp.predictions);
                return;
            }
            if !resp.status.is_ok() || resp.predictions.is_empty() {
                eprintln!("No places match '{query}' ({:?})", resp.status);
                std::process::exit(1);
            }
            for p in &resp.predictions {
                println!("{:<40} {:<40} {}", p.main_text, p.secondary_text, p.place_id);
            }
            eprintln!("\n{} predictions", resp.predictions.len());
        }
        Commands::Details { place_id } => {
            let client = direct_client(&config);
            let resp = client
                .details(&DetailsRequest::for_selection(&place_id))
                .await
                .unwrap_or_else(|e| fail(format!("Details failed: {e}")));

            let place = resp
                .place
                .filter(|_| resp.status.is_ok())
                .and_then(PlaceResult::from_details)
                .unwrap_or_else(|| fail(format!("Unable to retrieve details for {place_id} ({:?})", resp.status)));
            print_place(&place, cli.json);
        }
        Commands::Resolve { query, pick, navigate } => {
            let controller = mount(config, navigate).await;
            controller.set_query(&query);
            controller.settled().await;

            let state = controller.snapshot();
            if state.visible_predictions().is_empty() {
                fail(format!("No places match '{query}'"));
            }
            for (i, p) in state.visible_predictions().iter().enumerate() {
                eprintln!("{:>3}. {} — {}", i + 1, p.main_text, p.secondary_text);
            }

            let Some(index) = pick.checked_sub(1) else {
                fail("--pick starts at 1");
            };
            match controller.select_at(index).await {
                Some(place) if !navigate => print_place(&place, cli.json),
                Some(place) => eprintln!("Opened map at {}", place.location),
                None => std::process::exit(1),
            }
        }
        Commands::Interactive => {
            let controller = mount(config, false).await;
            if let Err(e) = session::run(&controller).await {
                fail(format!("Session ended: {e}"));
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "locus", &mut std::io::stdout());
        }
    }
}
