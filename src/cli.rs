//! Command-line argument parsing
//!
//! Arguments overlay the loaded configuration file, so a banner can be
//! tweaked from the shell without editing YAML.

use clap::Parser;
use std::path::PathBuf;

use crate::config::GridConfig;

/// Animated flickering-grid text banner
#[derive(Parser, Debug)]
#[command(name = "flickerfield", version, about = "Animated flickering-grid text banner")]
pub struct CliArgs {
    /// Primary banner text
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// First subtitle line
    #[arg(long, value_name = "TEXT")]
    pub subtext: Option<String>,

    /// Second subtitle line
    #[arg(long, value_name = "TEXT")]
    pub second_subtext: Option<String>,

    /// Load display parameters from a YAML file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cell side length in logical pixels
    #[arg(long, value_name = "PX")]
    pub square_size: Option<u32>,

    /// Gap between cells in logical pixels
    #[arg(long, value_name = "PX")]
    pub grid_gap: Option<u32>,

    /// Cell fill color (hex, rgb()/rgba(), or a CSS color name)
    #[arg(long, value_name = "COLOR")]
    pub color: Option<String>,

    /// Backdrop color
    #[arg(long, value_name = "COLOR")]
    pub background: Option<String>,

    /// Mask text color
    #[arg(long, value_name = "COLOR")]
    pub text_color: Option<String>,

    /// Draw a glow behind the primary text
    #[arg(long)]
    pub glow: bool,

    /// Window width in logical pixels (default: track the window)
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Load the base config (explicit file or default path) and overlay
    /// every argument that was given.
    pub fn into_config(self) -> GridConfig {
        let mut config = GridConfig::load(self.config.as_deref());

        if let Some(text) = self.text {
            config.text = text;
        }
        if self.subtext.is_some() {
            config.subtext = self.subtext;
        }
        if self.second_subtext.is_some() {
            config.second_subtext = self.second_subtext;
        }
        if let Some(square_size) = self.square_size {
            config.square_size = square_size;
        }
        if let Some(grid_gap) = self.grid_gap {
            config.grid_gap = grid_gap;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(text_color) = self.text_color {
            config.text_color = text_color;
        }
        if self.glow {
            config.text_glow = true;
        }
        if self.width.is_some() {
            config.width = self.width;
        }
        if self.height.is_some() {
            config.height = self.height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.normalize();
        config
    }
}
