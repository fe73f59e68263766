use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub timings: TimingConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default = "default_title_markers")]
    pub title_markers: Vec<String>,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            playlist: PlaylistConfig::default(),
            timings: TimingConfig::default(),
            selectors: SelectorConfig::default(),
            title_markers: default_title_markers(),
            catalog: CatalogConfig::default(),
            files: FilesConfig::default(),
        }
    }
}

fn default_title_markers() -> Vec<String> {
    vec!["feat.".to_string(), "ft.".to_string(), "From".to_string()]
}

// ============================================================
// Web player
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Persistent browser profile, so the login survives between runs.
    #[serde(default = "default_user_data_dir")]
    pub user_data_dir: PathBuf,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_data_dir: default_user_data_dir(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            launch_timeout_ms: default_launch_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://open.spotify.com".to_string()
}

fn default_user_data_dir() -> PathBuf {
    PathBuf::from("./browser_data")
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    900
}

fn default_launch_timeout_ms() -> u64 {
    30000
}

// ============================================================
// Target playlist
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    #[serde(default = "default_playlist_name")]
    pub name: String,
    /// Keys typed as type-ahead when no menu entry can be located.
    /// Defaults to the first word of `name`.
    #[serde(default)]
    pub type_ahead_prefix: Option<String>,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            name: default_playlist_name(),
            type_ahead_prefix: None,
        }
    }
}

fn default_playlist_name() -> String {
    "Rolling Loud 2026".to_string()
}

impl PlaylistConfig {
    /// Keys typed as type-ahead when selecting `playlist`: the configured
    /// prefix, else the first word of the playlist name.
    pub fn type_ahead_prefix(&self, playlist: &str) -> String {
        match &self.type_ahead_prefix {
            Some(prefix) if !prefix.is_empty() => prefix.clone(),
            _ => playlist
                .split_whitespace()
                .next()
                .unwrap_or(playlist)
                .to_string(),
        }
    }
}

// ============================================================
// Time budgets and settle delays (milliseconds)
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub navigation_timeout: u64,
    pub after_navigation: u64,
    pub category_filter_budget: u64,
    pub after_category_filter: u64,
    pub result_row_budget: u64,
    pub after_context_menu: u64,
    pub menu_entry_budget: u64,
    pub after_menu_entry: u64,
    pub playlist_filter_budget: u64,
    pub after_fill: u64,
    pub playlist_entry_budget: u64,
    pub type_ahead_key_delay: u64,
    pub after_type_ahead: u64,
    pub last_resort_budget: u64,
    pub after_selection: u64,
    pub between_items: u64,
    pub poll_interval: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: 15000,
            after_navigation: 1000,
            category_filter_budget: 2000,
            after_category_filter: 500,
            result_row_budget: 2000,
            after_context_menu: 500,
            menu_entry_budget: 1000,
            after_menu_entry: 1500,
            playlist_filter_budget: 1000,
            after_fill: 500,
            playlist_entry_budget: 800,
            type_ahead_key_delay: 50,
            after_type_ahead: 500,
            last_resort_budget: 2000,
            after_selection: 300,
            between_items: 500,
            poll_interval: 100,
        }
    }
}

/// Convert a millisecond setting.
pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// ============================================================
// Element location patterns
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSelector {
    pub name: String,
    pub selector: String,
}

impl NamedSelector {
    pub fn new(name: &str, selector: &str) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Element that narrows search results to tracks.
    pub category_filter: String,
    pub category_filter_text: String,
    /// Candidates for the first result row, tried in order.
    pub result_rows: Vec<NamedSelector>,
    /// Candidates for the "Add to playlist" context menu entry, tried in order.
    pub menu_entry: Vec<NamedSelector>,
    pub menu_entry_text: String,
    /// Text fields that filter the playlist menu. Each one must be scoped to the
    /// open menu; a page-level search box would swallow the playlist name.
    pub playlist_filter: Vec<String>,
    /// Element patterns searched for an entry named like the playlist.
    pub playlist_entry: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_filter: "button".to_string(),
            category_filter_text: "Songs".to_string(),
            result_rows: vec![
                NamedSelector::new("tracklist-row test id", "[data-testid=\"tracklist-row\"]"),
                NamedSelector::new("track-row test id", "[data-testid=\"track-row\"]"),
                NamedSelector::new(
                    "first row index",
                    "div[role=\"row\"][aria-rowindex=\"1\"]",
                ),
                NamedSelector::new(
                    "row inside tracklist",
                    "div[data-testid=\"tracklist\"] div[role=\"row\"]",
                ),
            ],
            menu_entry: vec![
                NamedSelector::new("menu item role", "[role=\"menuitem\"]"),
                NamedSelector::new("menu button", "button"),
                NamedSelector::new("menu label", "span"),
            ],
            menu_entry_text: "Add to playlist".to_string(),
            playlist_filter: vec![
                "[role=\"menu\"] input[placeholder*=\"playlist\"]".to_string(),
                "#context-menu input[type=\"text\"]".to_string(),
                "[role=\"menu\"] input[type=\"text\"]".to_string(),
            ],
            playlist_entry: vec![
                "[role=\"menuitem\"]".to_string(),
                "[role=\"option\"]".to_string(),
                "li".to_string(),
                "button".to_string(),
                "span".to_string(),
            ],
        }
    }
}

// ============================================================
// Catalog lookup
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Number of top tracks fetched per artist, by tier.
    #[serde(default = "default_songs_per_tier")]
    pub songs_per_tier: BTreeMap<u8, usize>,
    /// Used for tiers missing from `songs_per_tier`.
    #[serde(default = "default_songs")]
    pub default_songs: usize,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Artist names by tier.
    #[serde(default)]
    pub lineup: BTreeMap<u8, Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            songs_per_tier: default_songs_per_tier(),
            default_songs: default_songs(),
            request_delay_ms: default_request_delay_ms(),
            lineup: BTreeMap::new(),
        }
    }
}

impl CatalogConfig {
    pub fn songs_for_tier(&self, tier: u8) -> usize {
        self.songs_per_tier
            .get(&tier)
            .copied()
            .unwrap_or(self.default_songs)
    }
}

fn default_api_base() -> String {
    "https://api.deezer.com".to_string()
}

fn default_songs_per_tier() -> BTreeMap<u8, usize> {
    BTreeMap::from([(1, 7), (2, 5), (3, 3), (4, 2), (5, 1)])
}

fn default_songs() -> usize {
    1
}

fn default_request_delay_ms() -> u64 {
    250
}

// ============================================================
// Files
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_playlist_path")]
    pub playlist: PathBuf,
    #[serde(default = "default_failure_report_path")]
    pub failure_report: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            playlist: default_playlist_path(),
            failure_report: default_failure_report_path(),
        }
    }
}

fn default_playlist_path() -> PathBuf {
    PathBuf::from("playlist.json")
}

fn default_failure_report_path() -> PathBuf {
    PathBuf::from("failed_tracks.txt")
}
