//! Offscreen text mask
//!
//! The text layer is rendered once per (size, content, styling) key onto an
//! RGBA buffer over black, then sampled per cell: a pixel belongs to the
//! text if its red channel clears [`TEXT_THRESHOLD`]. The mask is never
//! displayed, it only classifies cells.

use crate::color::Color;
use crate::config::GridConfig;
use crate::font::MaskFont;

/// Red-channel brightness above which a pixel counts as text.
pub const TEXT_THRESHOLD: u8 = 200;

/// Rendered text layer, width x height RGBA pixels over black.
pub struct TextMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl TextMask {
    /// Wrap a raw RGBA buffer. Panics if `data` is not `width * height * 4`
    /// bytes; only sized buffers ever reach sampling.
    pub fn from_pixels(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height * 4, "mask buffer size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at (x, y) is part of the rendered text.
    /// Out-of-bounds samples are background.
    pub fn is_text(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[(y * self.width + x) * 4] > TEXT_THRESHOLD
    }

    /// Render the text layer for the given visible size and parameters.
    ///
    /// The primary text sits at `height/2 + text_y_offset`, subtexts at their
    /// own offsets below it. Empty strings simply leave the layer dark; no
    /// error is raised.
    pub fn render(
        width: u32,
        height: u32,
        config: &GridConfig,
        font: &MaskFont,
        text_color: Color,
        glow_color: Color,
    ) -> Self {
        let w = width as usize;
        let h = height as usize;
        let mut data = vec![0u8; w * h * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        if w == 0 || h == 0 {
            return Self::from_pixels(w, h, data);
        }

        let center_x = width as f32 / 2.0;
        let anchor = height as f32 / 2.0 + config.text_y_offset;

        // Primary coverage is kept separate: only it casts the glow
        let mut primary = vec![0u8; w * h];
        font.draw_centered(
            &mut primary,
            w,
            h,
            &config.text,
            config.font_size,
            center_x,
            anchor,
        );

        let mut coverage = primary.clone();
        if let Some(subtext) = &config.subtext {
            font.draw_centered(
                &mut coverage,
                w,
                h,
                subtext,
                config.subtext_font_size,
                center_x,
                anchor + config.subtext_y_offset,
            );
        }
        if let Some(second) = &config.second_subtext {
            font.draw_centered(
                &mut coverage,
                w,
                h,
                second,
                config.second_subtext_font_size,
                center_x,
                anchor + config.second_subtext_y_offset,
            );
        }

        let glow = if config.text_glow && config.glow_blur > 0 {
            Some(box_blur(&primary, w, h, config.glow_blur as usize))
        } else {
            None
        };

        let glow_alpha = glow_color.a as f32 / 255.0;
        for i in 0..w * h {
            let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
            if let Some(glow_buf) = &glow {
                let ga = glow_buf[i] as f32 / 255.0 * glow_alpha;
                r = ga * glow_color.r as f32;
                g = ga * glow_color.g as f32;
                b = ga * glow_color.b as f32;
            }
            let ta = coverage[i] as f32 / 255.0 * config.text_opacity;
            r = ta * text_color.r as f32 + (1.0 - ta) * r;
            g = ta * text_color.g as f32 + (1.0 - ta) * g;
            b = ta * text_color.b as f32 + (1.0 - ta) * b;
            data[i * 4] = r.round() as u8;
            data[i * 4 + 1] = g.round() as u8;
            data[i * 4 + 2] = b.round() as u8;
        }

        Self::from_pixels(w, h, data)
    }
}

/// Separable box blur over a single-channel layer, radius in pixels.
fn box_blur(src: &[u8], width: usize, height: usize, radius: usize) -> Vec<u8> {
    let mut horizontal = vec![0u8; src.len()];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let out = &mut horizontal[y * width..(y + 1) * width];
        blur_line(row, out, width, radius, 1);
    }
    let mut blurred = vec![0u8; src.len()];
    for x in 0..width {
        blur_line(
            &horizontal[x..],
            &mut blurred[x..],
            height,
            radius,
            width,
        );
    }
    blurred
}

/// One sliding-window pass over `len` samples spaced `stride` apart.
fn blur_line(src: &[u8], out: &mut [u8], len: usize, radius: usize, stride: usize) {
    if len == 0 {
        return;
    }
    let radius = radius.min(len - 1);
    let mut sum: u32 = 0;
    for i in 0..=radius {
        sum += src[i * stride] as u32;
    }
    for i in 0..len {
        let window = (i.min(radius) + 1 + radius.min(len - 1 - i)) as u32;
        out[i * stride] = (sum / window) as u8;
        if i + radius + 1 < len {
            sum += src[(i + radius + 1) * stride] as u32;
        }
        if i >= radius {
            sum -= src[(i - radius) * stride] as u32;
        }
    }
}

/// Everything the rendered mask depends on. Two equal keys are guaranteed
/// to produce pixel-identical masks.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskKey {
    width: u32,
    height: u32,
    text: String,
    subtext: Option<String>,
    second_subtext: Option<String>,
    font_size: f32,
    subtext_font_size: f32,
    second_subtext_font_size: f32,
    text_y_offset: f32,
    subtext_y_offset: f32,
    second_subtext_y_offset: f32,
    text_color: String,
    text_glow: bool,
    glow_color: String,
    glow_blur: u32,
    text_opacity: f32,
}

impl MaskKey {
    pub fn new(width: u32, height: u32, config: &GridConfig) -> Self {
        Self {
            width,
            height,
            text: config.text.clone(),
            subtext: config.subtext.clone(),
            second_subtext: config.second_subtext.clone(),
            font_size: config.font_size,
            subtext_font_size: config.subtext_font_size,
            second_subtext_font_size: config.second_subtext_font_size,
            text_y_offset: config.text_y_offset,
            subtext_y_offset: config.subtext_y_offset,
            second_subtext_y_offset: config.second_subtext_y_offset,
            text_color: config.text_color.clone(),
            text_glow: config.text_glow,
            glow_color: config.glow_color.clone(),
            glow_blur: config.glow_blur,
            text_opacity: config.text_opacity,
        }
    }
}

/// Single-entry cache for the rendered mask, keyed by [`MaskKey`].
///
/// The key changes whenever the visible size, text content or text styling
/// changes; the entry is rebuilt atomically so a stale mask is never
/// sampled against a freshly sized field.
#[derive(Default)]
pub struct MaskCache {
    entry: Option<(MaskKey, TextMask)>,
    builds: usize,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the mask for the given size and parameters, rendering it only
    /// if the cached entry's key no longer matches.
    pub fn get_or_build(
        &mut self,
        width: u32,
        height: u32,
        config: &GridConfig,
        font: &MaskFont,
        text_color: Color,
        glow_color: Color,
    ) -> &TextMask {
        let key = MaskKey::new(width, height, config);
        let stale = match &self.entry {
            Some((cached, _)) => *cached != key,
            None => true,
        };
        if stale {
            let mask = TextMask::render(width, height, config, font, text_color, glow_color);
            self.builds += 1;
            tracing::debug!(width, height, builds = self.builds, "rendered text mask");
            self.entry = Some((key, mask));
        }
        match &self.entry {
            Some((_, mask)) => mask,
            None => unreachable!("entry populated above"),
        }
    }

    /// Number of mask renders performed so far.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
