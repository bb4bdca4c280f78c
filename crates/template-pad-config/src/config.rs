/// Editor configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use template_pad_core::{EditorOptions, NoMatchPolicy};

use crate::palette::Palette;

/// Environment variable overriding where the template store lives.
pub const DATA_DIR_ENV: &str = "TEMPLATE_PAD_DATA_DIR";

const CONFIG_FILE_NAME: &str = "template-pad.json";
pub const STORE_FILE_NAME: &str = "templates.redb";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Delay between the last keystroke and the re-render (50..=1000).
    pub debounce_ms: u64,
    /// Delay before a blur may close the dropdown (0..=2000).
    pub blur_check_ms: u64,
    /// Gap between caret and dropdown in points.
    pub dropdown_margin: f32,
    /// Rows shown before the dropdown scrolls.
    pub max_visible_candidates: usize,
    pub no_match_policy: NoMatchPolicy,
    pub font_size: f32,
    /// Variable catalog JSON. Empty = built-in catalog.
    pub catalog_path: String,
    pub palette: Palette,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            blur_check_ms: 150,
            dropdown_margin: 4.0,
            max_visible_candidates: 8,
            no_match_policy: NoMatchPolicy::FallbackToAll,
            font_size: 16.0,
            catalog_path: String::new(),
            palette: Palette::default(),
        }
    }
}

impl EditorConfig {
    /// Returns the config file path: exe directory + `template-pad.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Directory holding the template store.
    ///
    /// Resolution order:
    /// 1. `$TEMPLATE_PAD_DATA_DIR` (if set and non-empty)
    /// 2. platform data directory + `template-pad`
    /// 3. the working directory
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .map(|d| d.join("template-pad"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Path of the template store inside [`data_dir`](Self::data_dir).
    pub fn store_path() -> PathBuf {
        Self::data_dir().join(STORE_FILE_NAME)
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            return config;
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| {
                serde_json::from_str::<EditorConfig>(&contents).map_err(|e| e.to_string())
            });
        let mut config = match parsed {
            Ok(config) => config,
            Err(e) => {
                // Keep the broken file for the user to fix.
                tracing::warn!("Failed to load config at {}: {e}", path.display());
                Self::default()
            }
        };
        config.sanitize();
        config
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.debounce_ms = self.debounce_ms.clamp(50, 1000);
        self.blur_check_ms = self.blur_check_ms.min(2000);
        if !self.dropdown_margin.is_finite() {
            self.dropdown_margin = 4.0;
        }
        self.dropdown_margin = self.dropdown_margin.clamp(0.0, 64.0);
        self.max_visible_candidates = self.max_visible_candidates.clamp(1, 50);
        if !self.font_size.is_finite() {
            self.font_size = 16.0;
        }
        self.font_size = self.font_size.clamp(6.0, 72.0);
        self.catalog_path = self.catalog_path.trim().to_string();
    }

    /// The catalog file to load, if one is configured.
    pub fn catalog_file(&self) -> Option<PathBuf> {
        (!self.catalog_path.is_empty()).then(|| PathBuf::from(&self.catalog_path))
    }

    /// Timing and policy knobs for the editor core.
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            blur_check: Duration::from_millis(self.blur_check_ms),
            no_match_policy: self.no_match_policy,
            dropdown_margin: self.dropdown_margin,
        }
    }
}
