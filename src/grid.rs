//! Lattice geometry and the flickering cell field
//!
//! The visible area is partitioned into square cells on a fixed pitch; each
//! cell carries one opacity scalar that the driver perturbs every frame.
//! Cell classification (text vs ambient) is sampled from the mask once per
//! build and reused for every subsequent update.

use rand::Rng;

use crate::color::{blend_over, Color};
use crate::config::GridConfig;
use crate::mask::TextMask;

/// Derived lattice dimensions for one visible size.
///
/// `cols`/`rows` count the cells whose top-left corner and full extent fit
/// inside the visible area; `scale` maps logical coordinates onto the
/// surface's backing resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeGeometry {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: u32,
    pub gap: u32,
    pub scale: f64,
}

impl LatticeGeometry {
    pub fn compute(width: u32, height: u32, cell_size: u32, gap: u32, scale: f64) -> Self {
        let cell_size = cell_size.max(1);
        let pitch = cell_size + gap;
        Self {
            cols: (width / pitch) as usize,
            rows: (height / pitch) as usize,
            cell_size,
            gap,
            scale,
        }
    }

    /// Cell pitch (size + gap) in logical pixels.
    pub fn pitch(&self) -> u32 {
        self.cell_size + self.gap
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left corner of cell (col, row) in logical pixels; doubles as the
    /// mask sample point for that cell.
    pub fn cell_origin(&self, col: usize, row: usize) -> (u32, u32) {
        (col as u32 * self.pitch(), row as u32 * self.pitch())
    }
}

/// Whether a cell flickers in the ambient band or the text band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Ambient,
    Text,
}

/// The numeric flicker knobs, snapshotted out of [`GridConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerParams {
    pub flicker_chance: f32,
    pub max_opacity: f32,
    pub text_flicker_chance: f32,
    pub text_opacity: f32,
    pub text_min_opacity: f32,
}

impl From<&GridConfig> for FlickerParams {
    fn from(config: &GridConfig) -> Self {
        Self {
            flicker_chance: config.flicker_chance,
            max_opacity: config.max_opacity,
            text_flicker_chance: config.text_flicker_chance,
            text_opacity: config.text_opacity,
            text_min_opacity: config.text_min_opacity,
        }
    }
}

/// Dense per-cell state, row-major (`index = row * cols + col`).
pub struct CellField {
    geometry: LatticeGeometry,
    kind: Vec<CellKind>,
    opacity: Vec<f32>,
}

impl CellField {
    /// Build the initial field for `geometry`, classifying each cell by
    /// sampling `mask` at the cell's origin. A missing mask (no text layer
    /// could be drawn) seeds every cell ambient.
    pub fn build(
        geometry: LatticeGeometry,
        mask: Option<&TextMask>,
        params: &FlickerParams,
        rng: &mut impl Rng,
    ) -> Self {
        let mut kind = Vec::with_capacity(geometry.len());
        let mut opacity = Vec::with_capacity(geometry.len());

        for row in 0..geometry.rows {
            for col in 0..geometry.cols {
                let (x, y) = geometry.cell_origin(col, row);
                let is_text = mask.is_some_and(|m| m.is_text(x as usize, y as usize));
                if is_text {
                    kind.push(CellKind::Text);
                    opacity.push(params.text_opacity);
                } else {
                    kind.push(CellKind::Ambient);
                    opacity.push(rng.random::<f32>() * params.max_opacity);
                }
            }
        }

        Self {
            geometry,
            kind,
            opacity,
        }
    }

    pub fn geometry(&self) -> LatticeGeometry {
        self.geometry
    }

    pub fn kinds(&self) -> &[CellKind] {
        &self.kind
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacity
    }

    /// Advance the field by `dt` seconds: each cell is reseeded with
    /// probability `chance * dt` into its classification's band, and keeps
    /// its previous opacity otherwise. Returns the number of reseeds.
    pub fn update(&mut self, dt: f32, params: &FlickerParams, rng: &mut impl Rng) -> usize {
        let dt = dt.max(0.0);
        let mut reseeds = 0;

        for (kind, opacity) in self.kind.iter().zip(self.opacity.iter_mut()) {
            match kind {
                CellKind::Text => {
                    if rng.random::<f32>() < params.text_flicker_chance * dt {
                        let span = params.text_opacity - params.text_min_opacity;
                        *opacity = params.text_min_opacity + rng.random::<f32>() * span;
                        reseeds += 1;
                    }
                }
                CellKind::Ambient => {
                    if rng.random::<f32>() < params.flicker_chance * dt {
                        *opacity = rng.random::<f32>() * params.max_opacity;
                        reseeds += 1;
                    }
                }
            }
        }

        reseeds
    }

    /// Paint every cell with opacity > 0 into an ARGB frame of
    /// `frame_w` x `frame_h` physical pixels. The frame must already be
    /// cleared to `background`; zero-opacity cells are skipped since they
    /// are indistinguishable from the cleared backdrop.
    pub fn draw(
        &self,
        frame: &mut [u32],
        frame_w: usize,
        frame_h: usize,
        cell_color: Color,
        background: Color,
    ) {
        let scale = self.geometry.scale;
        let size = (self.geometry.cell_size as f64 * scale).round() as usize;

        for row in 0..self.geometry.rows {
            for col in 0..self.geometry.cols {
                let opacity = self.opacity[row * self.geometry.cols + col];
                if opacity <= 0.0 {
                    continue;
                }

                let (ox, oy) = self.geometry.cell_origin(col, row);
                let x0 = (ox as f64 * scale).round() as usize;
                let y0 = (oy as f64 * scale).round() as usize;
                let pixel = blend_over(background, cell_color, opacity);

                for y in y0..(y0 + size).min(frame_h) {
                    let line = &mut frame[y * frame_w..(y + 1) * frame_w];
                    for px in line
                        .iter_mut()
                        .take((x0 + size).min(frame_w))
                        .skip(x0)
                    {
                        *px = pixel;
                    }
                }
            }
        }
    }
}
