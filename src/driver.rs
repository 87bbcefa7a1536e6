//! Animation driver state
//!
//! [`Driver`] owns everything the per-frame loop touches: the configuration
//! snapshot, resolved colors, the mask cache, the live cell field and the
//! RNG. The windowing layer feeds it three things — visibility changes,
//! size changes and frame ticks — and never mutates the field directly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::color::{self, Color};
use crate::config::GridConfig;
use crate::font::MaskFont;
use crate::grid::{CellField, FlickerParams, LatticeGeometry};
use crate::mask::MaskCache;

/// Colors resolved once per configuration.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub cell: Color,
    pub text: Color,
    pub glow: Color,
    pub background: Color,
}

impl Palette {
    pub fn resolve(config: &GridConfig) -> Self {
        Self {
            cell: color::resolve(&config.color),
            text: color::resolve(&config.text_color),
            glow: color::resolve(&config.glow_color),
            background: color::resolve(&config.background),
        }
    }
}

/// Owns the live cell field and drives it frame by frame.
///
/// The driver is windowing-agnostic: it paints into any ARGB slice, so the
/// whole per-frame path runs headless under test.
pub struct Driver {
    config: GridConfig,
    params: FlickerParams,
    palette: Palette,
    font: MaskFont,
    mask_cache: MaskCache,
    field: Option<CellField>,
    rng: Pcg64Mcg,
    in_view: bool,
    frames: u64,
}

impl Driver {
    pub fn new(mut config: GridConfig, font: MaskFont) -> Self {
        config.normalize();
        let params = FlickerParams::from(&config);
        let palette = Palette::resolve(&config);
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            config,
            params,
            palette,
            font,
            mask_cache: MaskCache::new(),
            field: None,
            rng: Pcg64Mcg::seed_from_u64(seed),
            in_view: true,
            frames: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn field(&self) -> Option<&CellField> {
        self.field.as_ref()
    }

    pub fn geometry(&self) -> Option<LatticeGeometry> {
        self.field.as_ref().map(|f| f.geometry())
    }

    /// Number of frames actually advanced (frozen while hidden).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// How many times the text mask has been rendered.
    pub fn mask_builds(&self) -> usize {
        self.mask_cache.builds()
    }

    /// Visibility detector hook: hidden drivers ignore ticks entirely.
    pub fn set_visible(&mut self, visible: bool) {
        if self.in_view != visible {
            tracing::debug!(visible, "visibility changed");
        }
        self.in_view = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.in_view
    }

    /// Size-change hook: re-key the mask cache and rebuild geometry and
    /// field together for the new logical size. The old field is replaced
    /// wholesale, so a stale mask is never sampled against it.
    pub fn rebuild(&mut self, width: u32, height: u32, scale: f64) {
        let geometry = LatticeGeometry::compute(
            width,
            height,
            self.config.square_size,
            self.config.grid_gap,
            scale,
        );
        let mask = self.mask_cache.get_or_build(
            width,
            height,
            &self.config,
            &self.font,
            self.palette.text,
            self.palette.glow,
        );
        let field = CellField::build(geometry, Some(mask), &self.params, &mut self.rng);
        tracing::debug!(
            cols = geometry.cols,
            rows = geometry.rows,
            scale,
            "rebuilt cell field"
        );
        self.field = Some(field);
    }

    /// Advance and paint one frame into `frame` (`frame_w` x `frame_h`
    /// physical pixels). Returns `false` without touching anything while
    /// the driver is hidden or no field has been built yet — a late tick
    /// after teardown or before setup is a no-op by construction.
    pub fn tick(&mut self, dt: f32, frame: &mut [u32], frame_w: usize, frame_h: usize) -> bool {
        if !self.in_view {
            return false;
        }
        let Some(field) = self.field.as_mut() else {
            return false;
        };

        let reseeds = field.update(dt, &self.params, &mut self.rng);
        frame.fill(self.palette.background.to_argb_u32());
        field.draw(frame, frame_w, frame_h, self.palette.cell, self.palette.background);
        self.frames += 1;
        tracing::trace!(reseeds, dt, "frame advanced");
        true
    }
}
