//! Display parameters for the flicker grid
//!
//! One immutable snapshot of everything the caller can tune: text content,
//! lattice density, flicker statistics, styling. Persisted as YAML in
//! `~/.config/flickerfield/config.yaml`; every field is optional in the file
//! and falls back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Caller-supplied display parameters.
///
/// Flicker chances are probabilities per second, combined with elapsed frame
/// time by the driver; opacities live in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Primary banner text; empty disables the text layer entirely
    pub text: String,
    /// First subtitle line
    pub subtext: Option<String>,
    /// Second subtitle line
    pub second_subtext: Option<String>,

    /// Cell side length in logical pixels
    pub square_size: u32,
    /// Gap between cells in logical pixels
    pub grid_gap: u32,

    /// Ambient reseed probability per second
    pub flicker_chance: f32,
    /// Upper bound for ambient cell opacity
    pub max_opacity: f32,
    /// Text-cell reseed probability per second
    pub text_flicker_chance: f32,
    /// Opacity a text cell is seeded at, and its flicker ceiling
    pub text_opacity: f32,
    /// Floor a text cell never flickers below
    pub text_min_opacity: f32,

    /// Cell fill color
    pub color: String,
    /// Backdrop the translucent cells compose against
    pub background: String,
    /// Color the mask text is drawn in; its red channel must stay bright
    /// for the mask threshold to see it
    pub text_color: String,
    pub text_glow: bool,
    pub glow_color: String,
    /// Glow blur radius in pixels
    pub glow_blur: u32,

    /// Primary text size in pixels
    pub font_size: f32,
    pub subtext_font_size: f32,
    pub second_subtext_font_size: f32,
    /// Vertical shift of the whole text block from center
    pub text_y_offset: f32,
    /// Subtext offset below the primary anchor
    pub subtext_y_offset: f32,
    pub second_subtext_y_offset: f32,

    /// Explicit surface size; omitted means track the window
    pub width: Option<u32>,
    pub height: Option<u32>,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            subtext: None,
            second_subtext: None,
            square_size: 4,
            grid_gap: 6,
            flicker_chance: 0.3,
            max_opacity: 0.3,
            text_flicker_chance: 0.1,
            text_opacity: 1.0,
            text_min_opacity: 0.8,
            color: "rgb(0, 0, 0)".to_string(),
            background: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            text_glow: false,
            glow_color: "rgba(255, 255, 255, 0.5)".to_string(),
            glow_blur: 5,
            font_size: 120.0,
            subtext_font_size: 40.0,
            second_subtext_font_size: 30.0,
            text_y_offset: 0.0,
            subtext_y_offset: 100.0,
            second_subtext_y_offset: 160.0,
            width: None,
            height: None,
            seed: None,
        }
    }
}

impl GridConfig {
    /// Load config from an explicit file, or the default config path, or
    /// fall back to defaults. Parse and read failures degrade with a warning
    /// rather than aborting the effect.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match crate::config_paths::config_file() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config directory available, using defaults");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp parameters into their valid domains.
    ///
    /// Invariants enforced: opacities in [0, 1],
    /// `text_min_opacity <= text_opacity`, cell size at least 1 pixel.
    pub fn normalize(&mut self) {
        self.square_size = self.square_size.max(1);
        self.max_opacity = self.max_opacity.clamp(0.0, 1.0);
        self.text_opacity = self.text_opacity.clamp(0.0, 1.0);
        self.text_min_opacity = self.text_min_opacity.clamp(0.0, 1.0);
        self.flicker_chance = self.flicker_chance.max(0.0);
        self.text_flicker_chance = self.text_flicker_chance.max(0.0);
        if self.text_min_opacity > self.text_opacity {
            tracing::warn!(
                "text_min_opacity {} exceeds text_opacity {}, clamping",
                self.text_min_opacity,
                self.text_opacity
            );
            self.text_min_opacity = self.text_opacity;
        }
    }
}
