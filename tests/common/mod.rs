//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use flickerfield::config::GridConfig;
use flickerfield::mask::TextMask;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Display parameters sized for fast headless tests
pub fn test_config() -> GridConfig {
    GridConfig {
        text: "HI".to_string(),
        font_size: 48.0,
        width: Some(200),
        height: Some(120),
        seed: Some(42),
        ..GridConfig::default()
    }
}

/// Deterministic RNG for field builds and updates
pub fn rng(seed: u64) -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(seed)
}

/// Mask with a single fully-lit rectangle spanning `[x0, x1) x [y0, y1)`,
/// black everywhere else.
pub fn mask_with_rect(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
) -> TextMask {
    let mut data = vec![0u8; width * height * 4];
    for px in data.chunks_exact_mut(4) {
        px[3] = 255;
    }
    for y in y0..y1.min(height) {
        for x in x0..x1.min(width) {
            let i = (y * width + x) * 4;
            data[i] = 255;
            data[i + 1] = 255;
            data[i + 2] = 255;
        }
    }
    TextMask::from_pixels(width, height, data)
}
