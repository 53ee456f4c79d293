use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

const APP_SENTINEL: &str = "cliff-shorts";

pub const DEFAULT_SWIPE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_LOOKAHEAD_MARGIN: f64 = 2.0;
pub const DEFAULT_SCROLL_STEP: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Minimum drag distance, in rows, that counts as a swipe.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,

    /// How close, in rows, the viewport bottom must get to the end of the
    /// feed before the next page is requested.
    #[serde(default = "default_lookahead_margin")]
    pub lookahead_margin: f64,

    /// Rows scrolled per mouse wheel notch.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_swipe_threshold() -> f64 {
    DEFAULT_SWIPE_THRESHOLD
}

fn default_lookahead_margin() -> f64 {
    DEFAULT_LOOKAHEAD_MARGIN
}

fn default_scroll_step() -> f64 {
    DEFAULT_SCROLL_STEP
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            api_base_url: default_api_base_url(),
            page_size: DEFAULT_PAGE_SIZE,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            lookahead_margin: DEFAULT_LOOKAHEAD_MARGIN,
            scroll_step: DEFAULT_SCROLL_STEP,
            theme: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        for (name, value) in [
            ("swipe_threshold", self.swipe_threshold),
            ("lookahead_margin", self.lookahead_margin),
            ("scroll_step", self.scroll_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a non-negative number (found {value})");
            }
        }
        Ok(())
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("cliff-shorts")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}
