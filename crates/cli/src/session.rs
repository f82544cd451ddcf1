//! Line-driven search session.
//!
//! Every plain line replaces the query, as if it had been typed into the
//! widget; commands start with `:`.

use tokio::io::{AsyncBufReadExt, BufReader};

use locus_core::types::{PointerTarget, SearchState};
use locus_core::SearchController;

const HELP: &str = "\
  <text>    replace the query
  :N        select prediction N
  :clear    clear the search
  :close    close the results panel
  :q        quit";

#[derive(Debug, PartialEq)]
enum Input {
    Query(String),
    /// Zero-based position among displayed predictions.
    Select(usize),
    Clear,
    Close,
    Quit,
    Help,
}

fn parse_line(line: &str) -> Input {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Input::Query(line.to_string());
    };
    match command {
        "q" | "quit" => Input::Quit,
        "clear" => Input::Clear,
        "close" => Input::Close,
        n => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Select(n - 1),
            _ => Input::Help,
        },
    }
}

fn render(state: &SearchState) -> String {
    let mut out = format!("> {}", state.query);
    if state.is_searching {
        out.push_str("  (searching…)");
    }
    for (i, p) in state.visible_predictions().iter().enumerate() {
        out.push_str(&format!("\n{:>3}. {}  {}", i + 1, p.main_text, p.secondary_text));
    }
    out
}

pub async fn run(controller: &SearchController) -> std::io::Result<()> {
    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Query(query) => {
                controller.set_query(query);
                controller.settled().await;
            }
            Input::Select(index) => {
                if let Some(place) = controller.select_at(index).await {
                    println!("{} — {} ({})", place.name, place.address, place.location);
                }
            }
            Input::Clear => controller.clear(),
            Input::Close => controller.pointer_down(PointerTarget::Outside),
            Input::Quit => break,
            Input::Help => {
                eprintln!("{HELP}");
                continue;
            }
        }
        println!("{}", render(&controller.snapshot()));
    }

    controller.unmount();
    Ok(())
}
