//! Runtime module - winit/platform integration
//!
//! This module contains platform-specific code for running the effect:
//! - `app` - ApplicationHandler, window and surface management
//! - `perf` - rolling frame statistics

pub mod app;
pub mod perf;

pub use app::App;
