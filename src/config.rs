//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content directory overrides any
//! subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [references]
//! books = ""                # Book table file; empty = built-in pt-BR table
//! version = "ara"           # Bible version used in reference links
//! link_base = "/biblia"     # URL prefix for reference links
//!
//! [timeline]
//! margin_ratio = 0.02       # Minimum visual gap, as a share of the total span
//! ruler_height = 48         # px
//! track_height = 40         # px
//! track_gap = 12            # px
//! default_range = 3.0       # Span of positional events without a range
//! months = ["janeiro", "fevereiro", ...]
//!
//! [colors.light]
//! background = "#ffffff"
//! ...
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
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

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Reference scanning and linking.
    pub references: ReferencesConfig,
    /// Timeline lane layout and sizing.
    pub timeline: TimelineConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            references: ReferencesConfig::default(),
            timeline: TimelineConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.references.link_base.is_empty() {
            return Err(ConfigError::Validation(
                "references.link_base must not be empty".into(),
            ));
        }
        if self.references.version.is_empty() {
            return Err(ConfigError::Validation(
                "references.version must not be empty".into(),
            ));
        }
        if self.timeline.months.len() != 12 {
            return Err(ConfigError::Validation(format!(
                "timeline.months must list 12 names, found {}",
                self.timeline.months.len()
            )));
        }
        if !(0.0..1.0).contains(&self.timeline.margin_ratio) {
            return Err(ConfigError::Validation(
                "timeline.margin_ratio must be in [0, 1)".into(),
            ));
        }
        if self.timeline.track_height == 0 {
            return Err(ConfigError::Validation(
                "timeline.track_height must be non-zero".into(),
            ));
        }
        if !(self.timeline.default_range.is_finite() && self.timeline.default_range > 0.0) {
            return Err(ConfigError::Validation(
                "timeline.default_range must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Reference scanning and linking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferencesConfig {
    /// Book table file, relative to the content root. Empty selects the
    /// built-in Portuguese table.
    pub books: String,
    /// Bible version id used when building reference links.
    pub version: String,
    /// URL prefix for reference links (`{link_base}/{version}/{book}/{chapter}`).
    pub link_base: String,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            books: String::new(),
            version: "ara".to_string(),
            link_base: "/biblia".to_string(),
        }
    }
}

/// Timeline lane layout and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineConfig {
    /// Minimum gap between bars sharing a lane, as a share of the total span.
    pub margin_ratio: f64,
    /// Height of the year/position ruler (px).
    pub ruler_height: u32,
    /// Height of one lane (px).
    pub track_height: u32,
    /// Vertical gap between lanes (px).
    pub track_gap: u32,
    /// Span given to positional events that omit `range`.
    pub default_range: f64,
    /// Month names in calendar order, matched case-insensitively.
    pub months: Vec<String>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            margin_ratio: 0.02,
            ruler_height: 48,
            track_height: 40,
            track_gap: 12,
            default_range: 3.0,
            months: crate::timeline::chronology::PT_BR_MONTHS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel scanning workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Reference link color.
    pub reference: String,
    /// Timeline bar fill.
    pub bar: String,
    /// Timeline bar text.
    pub bar_text: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            reference: "#7a4b16".to_string(),
            bar: "#e8dcc8".to_string(),
            bar_text: "#2b2118".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            reference: "#e0b77a".to_string(),
            bar: "#3a2f22".to_string(),
            bar_text: "#f2e8d8".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Verso Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Scripture references
# ---------------------------------------------------------------------------
[references]
# Book table file (TOML), relative to the content root.
# Leave empty to use the built-in Brazilian Portuguese table.
books = ""

# Bible version id used when building reference links.
version = "ara"

# URL prefix for reference links: {link_base}/{version}/{book}/{chapter}
link_base = "/biblia"

# ---------------------------------------------------------------------------
# Timelines
# ---------------------------------------------------------------------------
[timeline]
# Bars closer than this share of the total span are treated as overlapping.
margin_ratio = 0.02

# Ruler, lane, and inter-lane sizes in pixels.
ruler_height = 48
track_height = 40
track_gap = 12

# Span given to positional events that omit `range`.
default_range = 3.0

# Month names in calendar order, matched case-insensitively.
months = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
]

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
reference = "#7a4b16"     # Reference links
bar = "#e8dcc8"           # Timeline bars
bar_text = "#2b2118"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
reference = "#e0b77a"
bar = "#3a2f22"
bar_text = "#f2e8d8"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel scanning workers for `verso check`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-reference: {light_reference};
    --color-bar: {light_bar};
    --color-bar-text: {light_bar_text};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-reference: {dark_reference};
        --color-bar: {dark_bar};
        --color-bar-text: {dark_bar_text};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_reference = colors.light.reference,
        light_bar = colors.light.bar,
        light_bar_text = colors.light.bar_text,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_reference = colors.dark.reference,
        dark_bar = colors.dark.bar,
        dark_bar_text = colors.dark.bar_text,
    )
}

/// Generate CSS custom properties from timeline config.
pub fn generate_timeline_css(timeline: &TimelineConfig) -> String {
    format!(
        r#":root {{
    --ruler-height: {ruler}px;
    --track-height: {track}px;
    --track-gap: {gap}px;
}}"#,
        ruler = timeline.ruler_height,
        track = timeline.track_height,
        gap = timeline.track_gap,
    )
}
