//! Font loading for the text mask
//!
//! The mask generator rasterizes through whichever face is available: an
//! outline font discovered on the host (preferred), or a built-in scalable
//! 5x7 bitmap font so the text layer still renders in minimal environments
//! and tests stay deterministic.
//!
//! Discovery order: `FLICKERFIELD_FONT`, then a short list of common system
//! font paths (bold faces first, matching the source styling).

use std::path::PathBuf;

use fontdue::{Font, FontSettings};

/// Bitmap glyph cell dimensions, in font units.
const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;

/// Cap height of the bitmap face relative to the nominal pixel size.
const BITMAP_CAP_RATIO: f32 = 0.7;

/// A face the mask generator can rasterize text with.
pub enum MaskFont {
    /// Outline font rasterized via fontdue
    Outline(Font),
    /// Built-in 5x7 bitmap font, nearest-neighbor scaled
    Bitmap,
}

/// Load the best available mask font.
pub fn load() -> MaskFont {
    match load_outline() {
        Some(font) => MaskFont::Outline(font),
        None => {
            tracing::warn!("No outline font found, falling back to built-in bitmap font");
            MaskFont::Bitmap
        }
    }
}

fn load_outline() -> Option<Font> {
    for path in candidate_paths() {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        match Font::from_bytes(bytes, FontSettings::default()) {
            Ok(font) => {
                tracing::info!("Loaded mask font from {}", path.display());
                return Some(font);
            }
            Err(e) => {
                tracing::warn!("Failed to parse font at {}: {}", path.display(), e);
            }
        }
    }
    None
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(explicit) = std::env::var_os("FLICKERFIELD_FONT") {
        paths.push(PathBuf::from(explicit));
    }
    for p in [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ] {
        paths.push(PathBuf::from(p));
    }
    paths
}

impl MaskFont {
    /// Width in pixels of `text` rendered at `px`.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            MaskFont::Outline(font) => text
                .chars()
                .map(|ch| font.metrics(ch, px).advance_width)
                .sum(),
            MaskFont::Bitmap => {
                let (cell_w, _, spacing) = bitmap_cell(px);
                let n = text.chars().count();
                if n == 0 {
                    0.0
                } else {
                    (n * cell_w + (n - 1) * spacing) as f32
                }
            }
        }
    }

    /// Rasterize `text` at `px` into a single-channel coverage layer of
    /// `width` x `height`, horizontally centered on `cx` with the glyph
    /// block vertically centered on `cy`. Coverage is max-blended so
    /// overlapping draws brighten, never darken.
    pub fn draw_centered(
        &self,
        layer: &mut [u8],
        width: usize,
        height: usize,
        text: &str,
        px: f32,
        cx: f32,
        cy: f32,
    ) {
        if text.is_empty() || width == 0 || height == 0 {
            return;
        }
        let start_x = cx - self.measure(text, px) / 2.0;
        match self {
            MaskFont::Outline(font) => {
                draw_outline(font, layer, width, height, text, px, start_x, cy)
            }
            MaskFont::Bitmap => draw_bitmap(layer, width, height, text, px, start_x, cy),
        }
    }
}

fn draw_outline(
    font: &Font,
    layer: &mut [u8],
    width: usize,
    height: usize,
    text: &str,
    px: f32,
    start_x: f32,
    cy: f32,
) {
    // "middle" baseline: center of the ascent..descent span sits on cy
    let baseline = match font.horizontal_line_metrics(px) {
        Some(lm) => cy + (lm.ascent + lm.descent) / 2.0,
        None => cy + px * 0.35,
    };

    let mut current_x = start_x;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, px);

        // Position glyph for PositiveYDown coordinates (y = -height - ymin)
        let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

        for bitmap_y in 0..metrics.height {
            for bitmap_x in 0..metrics.width {
                let alpha = bitmap[bitmap_y * metrics.width + bitmap_x];
                if alpha == 0 {
                    continue;
                }
                let px_x = current_x as isize + bitmap_x as isize + metrics.xmin as isize;
                let px_y = (glyph_top + bitmap_y as f32) as isize;
                if px_x >= 0 && px_y >= 0 && (px_x as usize) < width && (px_y as usize) < height {
                    let idx = px_y as usize * width + px_x as usize;
                    layer[idx] = layer[idx].max(alpha);
                }
            }
        }

        current_x += metrics.advance_width;
    }
}

/// Pixel dimensions of one bitmap glyph cell at nominal size `px`:
/// (width, height, inter-glyph spacing).
fn bitmap_cell(px: f32) -> (usize, usize, usize) {
    let cell_h = ((px * BITMAP_CAP_RATIO).round() as usize).max(GLYPH_HEIGHT);
    let cell_w = (cell_h * GLYPH_WIDTH / GLYPH_HEIGHT).max(1);
    let spacing = (cell_w / GLYPH_WIDTH).max(1);
    (cell_w, cell_h, spacing)
}

fn draw_bitmap(
    layer: &mut [u8],
    width: usize,
    height: usize,
    text: &str,
    px: f32,
    start_x: f32,
    cy: f32,
) {
    let (cell_w, cell_h, spacing) = bitmap_cell(px);
    let top = (cy - cell_h as f32 / 2.0) as isize;
    let mut left = start_x as isize;

    for ch in text.chars() {
        let rows = glyph(ch.to_ascii_uppercase());
        // Nearest-neighbor upscale of the 5x7 cell
        for py in 0..cell_h {
            let src_row = py * GLYPH_HEIGHT / cell_h;
            let bits = rows[src_row];
            for px_i in 0..cell_w {
                let src_col = px_i * GLYPH_WIDTH / cell_w;
                if bits & (1 << (GLYPH_WIDTH - 1 - src_col)) == 0 {
                    continue;
                }
                let x = left + px_i as isize;
                let y = top + py as isize;
                if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                    layer[y as usize * width + x as usize] = 255;
                }
            }
        }
        left += (cell_w + spacing) as isize;
    }
}

/// 5x7 bitmap glyph lookup. Each row is a u8 with lower 5 bits = pixels
/// (bit 4 = leftmost). Unknown characters render blank but still advance.
const fn glyph(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        _ => [0x00; GLYPH_HEIGHT],
    }
}
