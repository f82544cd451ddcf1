//! Configuration: defaults, `locus.toml` overrides, then environment overrides.
//!
//! Lookup order for the file: an explicit path, `./locus.toml`, then
//! `~/.locus/locus.toml` (`%APPDATA%/locus/locus.toml` on Windows). A missing or
//! unreadable file leaves the defaults in place with a warning; the API key is
//! normally supplied through `LOCUS_MAPS_API_KEY` or `GOOGLE_MAPS_API_KEY`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::DEFAULT_PLACE_TYPES;
use crate::debounce::DEFAULT_DEBOUNCE;

pub const CONFIG_FILE_NAME: &str = "locus.toml";

/// Environment variables holding the API key, in priority order.
pub const API_KEY_ENV_VARS: &[&str] = &["LOCUS_MAPS_API_KEY", "GOOGLE_MAPS_API_KEY"];

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Known keys in `locus.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["api_key", "debounce_ms", "request_timeout_ms", "place_types", "endpoint", "app_url"];

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Maps service credential. Absent means the widget stays a plain text box.
    pub api_key: Option<String>,
    pub debounce: Duration,
    /// Upper bound on each service call. `None` waits forever.
    pub request_timeout: Option<Duration>,
    pub place_types: Vec<String>,
    /// Base URL of the Places web service.
    pub endpoint: String,
    /// Base URL the fallback navigation is relative to.
    pub app_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            place_types: DEFAULT_PLACE_TYPES.iter().map(|t| t.to_string()).collect(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

impl SearchConfig {
    /// The API key, if present and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Platform paths
// ---------------------------------------------------------------------------

/// Platform-aware home directory: `HOME` on Unix, `USERPROFILE` on Windows.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok().map(PathBuf::from)
}

/// Platform-aware config directory: `~/.locus` on Unix, `%APPDATA%/locus` on Windows.
pub fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("APPDATA").ok().map(|a| PathBuf::from(a).join("locus"))
    } else {
        home_dir().map(|h| h.join(".locus"))
    }
}

fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    config_dir().map(|d| d.join(CONFIG_FILE_NAME)).filter(|p| p.exists())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Load configuration: defaults, then the config file, then the environment.
pub fn load_config(explicit: Option<&Path>) -> SearchConfig {
    let mut config = SearchConfig::default();

    if let Some(path) = find_config_file(explicit) {
        debug!(path = %path.display(), "Loading config");
        match std::fs::read_to_string(&path) {
            Ok(content) => apply_toml(&mut config, &content),
            Err(e) => warn!(path = %path.display(), "Could not read config: {e}"),
        }
    }

    apply_env(&mut config, |name| std::env::var(name).ok());
    config
}

/// Merge `locus.toml` content into `config`. Unknown keys warn with a typo
/// suggestion; malformed content warns and leaves `config` untouched.
pub fn apply_toml(config: &mut SearchConfig, content: &str) {
    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) => {
            warn!("Failed to parse {CONFIG_FILE_NAME}: {e}");
            return;
        }
    };

    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(s) if edit_distance(key, s) <= 3 => warn!(
                key = key.as_str(),
                suggestion = *s,
                "Unknown key in {CONFIG_FILE_NAME} — did you mean '{s}'?"
            ),
            _ => warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }

    if let Some(key) = table.get("api_key").and_then(|v| v.as_str()) {
        config.api_key = Some(key.to_string());
    }

    if let Some(ms) = table.get("debounce_ms").and_then(|v| v.as_integer()) {
        match u64::try_from(ms) {
            Ok(ms) => config.debounce = Duration::from_millis(ms),
            Err(_) => warn!(value = ms, "debounce_ms must be non-negative"),
        }
    }

    // 0 disables the timeout
    if let Some(ms) = table.get("request_timeout_ms").and_then(|v| v.as_integer()) {
        match u64::try_from(ms) {
            Ok(0) => config.request_timeout = None,
            Ok(ms) => config.request_timeout = Some(Duration::from_millis(ms)),
            Err(_) => warn!(value = ms, "request_timeout_ms must be non-negative"),
        }
    }

    if let Some(types) = table.get("place_types").and_then(|v| v.as_array()) {
        config.place_types =
            types.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect();
    }

    if let Some(endpoint) = table.get("endpoint").and_then(|v| v.as_str()) {
        config.endpoint = endpoint.to_string();
    }

    if let Some(url) = table.get("app_url").and_then(|v| v.as_str()) {
        config.app_url = url.to_string();
    }
}

/// Apply environment overrides through `lookup`. The first non-blank
/// [`API_KEY_ENV_VARS`] entry wins over the file's key.
pub fn apply_env(config: &mut SearchConfig, lookup: impl Fn(&str) -> Option<String>) {
    let key = API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|v| !v.trim().is_empty());
    if let Some(key) = key {
        config.api_key = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_widget_behaviour() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.place_types, vec!["geocode", "establishment"]);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = SearchConfig::default().with_api_key("   ");
        assert!(config.api_key().is_none());
        let config = SearchConfig::default().with_api_key(" abc ");
        assert_eq!(config.api_key(), Some("abc"));
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut config = SearchConfig::default();
        apply_toml(
            &mut config,
            r#"
api_key = "file-key"
debounce_ms = 150
request_timeout_ms = 0
place_types = ["geocode"]
endpoint = "http://127.0.0.1:9999"
app_url = "https://maps.example.com"
"#,
        );
        assert_eq!(config.api_key(), Some("file-key"));
        assert_eq!(config.debounce, Duration::from_millis(150));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.place_types, vec!["geocode"]);
        assert_eq!(config.endpoint, "http://127.0.0.1:9999");
        assert_eq!(config.app_url, "https://maps.example.com");
    }

    #[test]
    fn malformed_toml_keeps_defaults() {
        let mut config = SearchConfig::default();
        apply_toml(&mut config, "debounce_ms = [");
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn negative_durations_are_ignored() {
        let mut config = SearchConfig::default();
        apply_toml(&mut config, "debounce_ms = -5\nrequest_timeout_ms = -1");
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(config.request_timeout, Some(DEFAULT_REQUEST_TIMEOUT));
    }

    #[test]
    fn env_key_wins_over_file() {
        let mut config = SearchConfig::default().with_api_key("file-key");
        let env: HashMap<&str, &str> =
            [("LOCUS_MAPS_API_KEY", ""), ("GOOGLE_MAPS_API_KEY", "env-key")].into_iter().collect();
        apply_env(&mut config, |name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.api_key(), Some("env-key"));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "debounce_ms = 42\n").unwrap();
        let config = load_config(Some(&path));
        assert_eq!(config.debounce, Duration::from_millis(42));
    }

    #[test]
    fn missing_explicit_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml")));
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
    }

    #[test]
    fn edit_distance_suggests_close_keys() {
        assert_eq!(edit_distance("debounce", "debounce_ms"), 3);
        assert_eq!(edit_distance("api_key", "api_key"), 0);
    }
}
