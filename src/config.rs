//! Viewer configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data = "docs/slide_new.yaml"      # Newsletter document (YAML or JSON)
//! asset_base_path = "data/assets/"  # Prefix for every asset source
//! strip_prefix = "assets/"          # Redundant prefix removed from sources
//!
//! [sections]
//! order = ["news", "models", "papers", "blogs", "opinion", "exit"]
//!
//! [exit]
//! name = "Exit"
//! qr_image = "assets/qr.png"
//! archive_url = "index_all.html"
//! archive_label = "view all previous issues"
//! tagline = "see you next week!"
//!
//! [transitions]                     # Milliseconds
//! within_post = 150
//! between_posts = 150
//! between_groups = 250
//! section = 400
//! section_horizontal = 400
//! micro_settle = 25
//! stack_fade = 200
//! overlay = 400
//! tab_pulse = 400
//!
//! [stack]
//! max_depth = 3
//!
//! [timing]                          # Milliseconds
//! tab_bar_auto_hide = 3000
//! tab_bar_dimmed = 800
//! onboarding = 4000
//! onboarding_fade = 500
//! session_tab_bar = 500
//!
//! [storage]
//! mode = "newsletterViewerMode"
//! onboarded = "newsletterViewerOnboarded"
//! selected_tags = "newsletterSelectedTags"
//!
//! [input]
//! min_swipe_distance = 50
//! max_swipe_ms = 300
//! tap_slop = 10
//! top_tap_zone = 60
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Viewer configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Path to the newsletter document.
    pub data: String,
    /// Prepended to every asset `source`.
    pub asset_base_path: String,
    /// Stripped from the start of a `source` before the base path is added.
    pub strip_prefix: String,
    pub sections: SectionsConfig,
    pub exit: ExitConfig,
    pub transitions: TransitionTimings,
    pub stack: StackConfig,
    pub timing: TimingConfig,
    pub storage: StorageKeys,
    pub input: InputConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data: "docs/slide_new.yaml".to_string(),
            asset_base_path: "data/assets/".to_string(),
            strip_prefix: "assets/".to_string(),
            sections: SectionsConfig::default(),
            exit: ExitConfig::default(),
            transitions: TransitionTimings::default(),
            stack: StackConfig::default(),
            timing: TimingConfig::default(),
            storage: StorageKeys::default(),
            input: InputConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack.max_depth == 0 {
            return Err(ConfigError::Validation(
                "stack.max_depth must be at least 1".into(),
            ));
        }
        let t = &self.transitions;
        let durations = [
            ("within_post", t.within_post),
            ("between_posts", t.between_posts),
            ("between_groups", t.between_groups),
            ("section", t.section),
            ("section_horizontal", t.section_horizontal),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::Validation(format!(
                "transitions.{name} must be greater than 0"
            )));
        }
        if self.input.min_swipe_distance == 0 {
            return Err(ConfigError::Validation(
                "input.min_swipe_distance must be greater than 0".into(),
            ));
        }
        let keys = &self.storage;
        if keys.mode.is_empty() || keys.onboarded.is_empty() || keys.selected_tags.is_empty() {
            return Err(ConfigError::Validation(
                "storage keys must not be empty".into(),
            ));
        }
        if keys.mode == keys.onboarded
            || keys.mode == keys.selected_tags
            || keys.onboarded == keys.selected_tags
        {
            return Err(ConfigError::Validation(
                "storage keys must be distinct".into(),
            ));
        }
        Ok(())
    }
}

/// Section tab ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    /// Section keys in tab order. Sections not listed follow in the order
    /// they appear in the document.
    pub order: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            order: ["news", "models", "papers", "blogs", "opinion", "exit"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Content of the synthetic exit slide appended after the last section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExitConfig {
    pub name: String,
    pub qr_image: String,
    pub archive_url: String,
    pub archive_label: String,
    pub tagline: String,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            name: "Exit".to_string(),
            qr_image: "assets/qr.png".to_string(),
            archive_url: "index_all.html".to_string(),
            archive_label: "view all previous issues".to_string(),
            tagline: "see you next week!".to_string(),
        }
    }
}

/// Transition durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionTimings {
    pub within_post: u64,
    pub between_posts: u64,
    pub between_groups: u64,
    pub section: u64,
    pub section_horizontal: u64,
    /// Extra hold after post-level transitions before cleanup.
    pub micro_settle: u64,
    /// Fade-out of stacked slides when the bundle stack is cleared.
    pub stack_fade: u64,
    pub overlay: u64,
    pub tab_pulse: u64,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            within_post: 150,
            between_posts: 150,
            between_groups: 250,
            section: 400,
            section_horizontal: 400,
            micro_settle: 25,
            stack_fade: 200,
            overlay: 400,
            tab_pulse: 400,
        }
    }
}

/// Bundle stack presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    /// Deepest visual depth tier. Older entries share this tier.
    pub max_depth: u8,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// Chrome timers in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub tab_bar_auto_hide: u64,
    pub tab_bar_dimmed: u64,
    pub onboarding: u64,
    pub onboarding_fade: u64,
    pub session_tab_bar: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tab_bar_auto_hide: 3000,
            tab_bar_dimmed: 800,
            onboarding: 4000,
            onboarding_fade: 500,
            session_tab_bar: 500,
        }
    }
}

/// Key names used in the persisted view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageKeys {
    pub mode: String,
    pub onboarded: String,
    pub selected_tags: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            mode: "newsletterViewerMode".to_string(),
            onboarded: "newsletterViewerOnboarded".to_string(),
            selected_tags: "newsletterSelectedTags".to_string(),
        }
    }
}

/// Touch gesture thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Minimum travel in pixels for a swipe.
    pub min_swipe_distance: u32,
    /// Swipes slower than this are ignored.
    pub max_swipe_ms: u64,
    /// Maximum travel in pixels for a tap.
    pub tap_slop: u32,
    /// Taps above this y coordinate toggle the tab bar.
    pub top_tap_zone: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: 50,
            max_swipe_ms: 300,
            tap_slop: 10,
            top_tap_zone: 60,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ViewerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ViewerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `config.toml` path, falling back to stock defaults when
/// the file is absent.
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# newsdeck configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Newsletter document (YAML, or JSON when the extension is .json).
data = "docs/slide_new.yaml"

# Prepended to every asset source path.
asset_base_path = "data/assets/"

# Removed from the start of an asset source before the base path is added.
strip_prefix = "assets/"

# ---------------------------------------------------------------------------
# Section tabs
# ---------------------------------------------------------------------------
[sections]
# Tab order by section key (lowercased section name). Sections not listed
# here follow in document order.
order = ["news", "models", "papers", "blogs", "opinion", "exit"]

# ---------------------------------------------------------------------------
# Exit slide (appended after the last section)
# ---------------------------------------------------------------------------
[exit]
name = "Exit"
qr_image = "assets/qr.png"
archive_url = "index_all.html"
archive_label = "view all previous issues"
tagline = "see you next week!"

# ---------------------------------------------------------------------------
# Transition durations (milliseconds)
# ---------------------------------------------------------------------------
[transitions]
within_post = 150
between_posts = 150
between_groups = 250
section = 400
section_horizontal = 400
# Extra hold after post-level transitions.
micro_settle = 25
# Fade-out of stacked slides when a bundle is left.
stack_fade = 200
overlay = 400
tab_pulse = 400

# ---------------------------------------------------------------------------
# Bundle stack
# ---------------------------------------------------------------------------
[stack]
# Deepest visual depth tier for stacked posts.
max_depth = 3

# ---------------------------------------------------------------------------
# Chrome timers (milliseconds)
# ---------------------------------------------------------------------------
[timing]
tab_bar_auto_hide = 3000
tab_bar_dimmed = 800
onboarding = 4000
onboarding_fade = 500
session_tab_bar = 500

# ---------------------------------------------------------------------------
# Persisted view state keys
# ---------------------------------------------------------------------------
[storage]
mode = "newsletterViewerMode"
onboarded = "newsletterViewerOnboarded"
selected_tags = "newsletterSelectedTags"

# ---------------------------------------------------------------------------
# Touch input
# ---------------------------------------------------------------------------
[input]
min_swipe_distance = 50
max_swipe_ms = 300
tap_slop = 10
top_tap_zone = 60
"##
}
