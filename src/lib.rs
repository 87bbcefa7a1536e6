//! flickerfield - animated flickering-grid text banner
//!
//! A rectangular field of small cells, each independently reseeding its
//! opacity over time, forming a background texture that spells out a text
//! overlay by biasing the flicker statistics of cells under the glyphs.
//! Everything is painted on the CPU into an ARGB buffer; the windowing
//! layer lives binary-side in `runtime/`.

pub mod cli;
pub mod color;
pub mod config;
pub mod config_paths;
pub mod driver;
pub mod font;
pub mod grid;
pub mod mask;
pub mod tracing;

// Re-export commonly used types
pub use config::GridConfig;
pub use driver::{Driver, Palette};
pub use grid::{CellField, CellKind, FlickerParams, LatticeGeometry};
pub use mask::{MaskCache, TextMask};
