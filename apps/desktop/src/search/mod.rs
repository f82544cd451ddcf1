//! Location search bar: input, busy indicator and prediction dropdown.

mod search_bar;

pub use search_bar::SearchBar;
