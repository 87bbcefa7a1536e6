//! Lattice geometry and cell field tests
//!
//! Geometry always fits the visible area, classification is a pure function
//! of the mask, opacities stay inside their classification's band, and
//! flicker statistics are frame-rate independent.

mod common;

use common::{mask_with_rect, rng, test_config};
use flickerfield::color::Color;
use flickerfield::config::GridConfig;
use flickerfield::grid::{CellField, CellKind, FlickerParams, LatticeGeometry};

fn default_params() -> FlickerParams {
    FlickerParams::from(&GridConfig::default())
}

// ========================================================================
// Geometry
// ========================================================================

#[test]
fn test_geometry_fits_visible_area() {
    for (w, h) in [(800u32, 600u32), (503, 247), (10, 10), (9, 9)] {
        let g = LatticeGeometry::compute(w, h, 4, 6, 1.0);
        assert!(g.cols as u32 * g.pitch() <= w, "{}x{}", w, h);
        assert!(g.rows as u32 * g.pitch() <= h, "{}x{}", w, h);
    }
}

#[test]
fn test_geometry_resize_recomputes_counts() {
    let a = LatticeGeometry::compute(800, 600, 4, 6, 1.0);
    let b = LatticeGeometry::compute(403, 207, 4, 6, 1.0);
    assert_eq!(a.cols, 80);
    assert_eq!(a.rows, 60);
    assert_eq!(b.cols, 40);
    assert_eq!(b.rows, 20);
    assert!(b.cols as u32 * b.pitch() <= 403);
    assert!(b.rows as u32 * b.pitch() <= 207);
}

#[test]
fn test_geometry_smaller_than_pitch_is_empty() {
    let g = LatticeGeometry::compute(5, 120, 4, 6, 1.0);
    assert_eq!(g.cols, 0);
    assert!(g.is_empty());
}

#[test]
fn test_cell_origin_uses_pitch() {
    let g = LatticeGeometry::compute(100, 100, 4, 6, 2.0);
    assert_eq!(g.cell_origin(0, 0), (0, 0));
    assert_eq!(g.cell_origin(3, 2), (30, 20));
}

// ========================================================================
// Classification
// ========================================================================

#[test]
fn test_text_sampling_single_rect() {
    // Lit square from (20,20) to (40,40) on a 10px pitch: exactly the cells
    // sampling (20,20), (30,20), (20,30), (30,30) are text.
    let mask = mask_with_rect(100, 100, 20, 20, 40, 40);
    let geometry = LatticeGeometry::compute(100, 100, 4, 6, 1.0);
    let field = CellField::build(geometry, Some(&mask), &default_params(), &mut rng(1));

    for row in 0..geometry.rows {
        for col in 0..geometry.cols {
            let expected = matches!((col, row), (2, 2) | (3, 2) | (2, 3) | (3, 3));
            let kind = field.kinds()[row * geometry.cols + col];
            assert_eq!(
                kind == CellKind::Text,
                expected,
                "cell ({}, {}) misclassified",
                col,
                row
            );
        }
    }
}

#[test]
fn test_classification_idempotent_across_builds() {
    let mask = mask_with_rect(100, 100, 10, 10, 60, 30);
    let geometry = LatticeGeometry::compute(100, 100, 4, 6, 1.0);
    let a = CellField::build(geometry, Some(&mask), &default_params(), &mut rng(1));
    let b = CellField::build(geometry, Some(&mask), &default_params(), &mut rng(999));
    assert_eq!(a.kinds(), b.kinds());
}

#[test]
fn test_missing_mask_seeds_all_ambient() {
    let geometry = LatticeGeometry::compute(200, 100, 4, 6, 1.0);
    let field = CellField::build(geometry, None, &default_params(), &mut rng(3));
    assert!(field.kinds().iter().all(|&k| k == CellKind::Ambient));
}

// ========================================================================
// Seeding and update bounds
// ========================================================================

#[test]
fn test_initial_opacities_in_band() {
    let params = default_params();
    let mask = mask_with_rect(100, 100, 20, 20, 40, 40);
    let geometry = LatticeGeometry::compute(100, 100, 4, 6, 1.0);
    let field = CellField::build(geometry, Some(&mask), &params, &mut rng(4));

    for (kind, &opacity) in field.kinds().iter().zip(field.opacities()) {
        match kind {
            CellKind::Text => assert_eq!(opacity, params.text_opacity),
            CellKind::Ambient => {
                assert!(opacity >= 0.0 && opacity < params.max_opacity);
            }
        }
    }
}

#[test]
fn test_opacities_stay_in_band_over_many_frames() {
    let params = default_params();
    let mask = mask_with_rect(100, 100, 0, 0, 50, 50);
    let geometry = LatticeGeometry::compute(100, 100, 4, 6, 1.0);
    let mut field = CellField::build(geometry, Some(&mask), &params, &mut rng(5));
    let mut r = rng(6);

    for _ in 0..200 {
        field.update(0.05, &params, &mut r);
        for (kind, &opacity) in field.kinds().iter().zip(field.opacities()) {
            match kind {
                CellKind::Text => {
                    assert!(opacity >= params.text_min_opacity);
                    assert!(opacity <= params.text_opacity);
                }
                CellKind::Ambient => {
                    assert!(opacity >= 0.0);
                    assert!(opacity < params.max_opacity);
                }
            }
        }
    }
}

#[test]
fn test_update_on_empty_field_is_noop() {
    let geometry = LatticeGeometry::compute(5, 5, 4, 6, 1.0);
    let params = default_params();
    let mut field = CellField::build(geometry, None, &params, &mut rng(7));
    assert_eq!(field.update(1.0, &params, &mut rng(8)), 0);
}

#[test]
fn test_negative_dt_reseeds_nothing() {
    let geometry = LatticeGeometry::compute(100, 100, 1, 0, 1.0);
    let params = default_params();
    let mut field = CellField::build(geometry, None, &params, &mut rng(9));
    assert_eq!(field.update(-1.0, &params, &mut rng(10)), 0);
}

// ========================================================================
// Frame-rate independence
// ========================================================================

#[test]
fn test_flip_rate_independent_of_frame_rate() {
    // One dt=1.0 step and ten dt=0.1 steps should reseed the same number of
    // cells in expectation: cells * chance per second.
    let geometry = LatticeGeometry::compute(500, 200, 1, 0, 1.0);
    let params = default_params();
    let expected = geometry.len() as f64 * params.flicker_chance as f64;

    let mut coarse_field = CellField::build(geometry, None, &params, &mut rng(11));
    let mut coarse_rng = rng(12);
    let coarse = coarse_field.update(1.0, &params, &mut coarse_rng) as f64;

    let mut fine_field = CellField::build(geometry, None, &params, &mut rng(13));
    let mut fine_rng = rng(14);
    let mut fine = 0.0;
    for _ in 0..10 {
        fine += fine_field.update(0.1, &params, &mut fine_rng) as f64;
    }

    assert!(
        (coarse - expected).abs() / expected < 0.05,
        "coarse rate off: {} vs {}",
        coarse,
        expected
    );
    assert!(
        (fine - expected).abs() / expected < 0.05,
        "fine rate off: {} vs {}",
        fine,
        expected
    );
}

// ========================================================================
// Drawing
// ========================================================================

#[test]
fn test_draw_paints_text_cells_and_leaves_gaps() {
    // Fully lit mask: every cell is text at opacity 1.0, so cell pixels take
    // the fill color and gap pixels keep the background.
    let mut config = test_config();
    config.square_size = 2;
    config.grid_gap = 2;
    let params = FlickerParams::from(&config);

    let mask = mask_with_rect(16, 8, 0, 0, 16, 8);
    let geometry = LatticeGeometry::compute(16, 8, 2, 2, 1.0);
    let field = CellField::build(geometry, Some(&mask), &params, &mut rng(15));

    let background = Color::rgb(0xFF, 0xFF, 0xFF);
    let fill = Color::rgb(0x00, 0x00, 0x00);
    let mut frame = vec![background.to_argb_u32(); 16 * 8];
    field.draw(&mut frame, 16, 8, fill, background);

    assert_eq!(frame[0], fill.to_argb_u32(), "cell origin painted");
    assert_eq!(frame[1], fill.to_argb_u32(), "cell interior painted");
    assert_eq!(frame[2], background.to_argb_u32(), "gap left untouched");
    assert_eq!(frame[3], background.to_argb_u32(), "gap left untouched");
}

#[test]
fn test_draw_skips_zero_opacity_cells() {
    let mut config = test_config();
    config.max_opacity = 0.0;
    let params = FlickerParams::from(&config);

    let geometry = LatticeGeometry::compute(20, 20, 4, 6, 1.0);
    let field = CellField::build(geometry, None, &params, &mut rng(16));
    assert!(field.opacities().iter().all(|&o| o == 0.0));

    let background = Color::rgb(0x10, 0x20, 0x30);
    let mut frame = vec![background.to_argb_u32(); 20 * 20];
    field.draw(&mut frame, 20, 20, Color::rgb(0xFF, 0, 0), background);
    assert!(frame.iter().all(|&px| px == background.to_argb_u32()));
}

#[test]
fn test_draw_respects_device_pixel_scale() {
    // One cell at scale 2.0: a 2px logical cell covers 4 physical pixels
    // per side.
    let mask = mask_with_rect(4, 4, 0, 0, 4, 4);
    let geometry = LatticeGeometry::compute(4, 4, 2, 2, 2.0);
    let params = default_params();
    let field = CellField::build(geometry, Some(&mask), &params, &mut rng(17));

    let background = Color::rgb(0xFF, 0xFF, 0xFF);
    let fill = Color::rgb(0x00, 0x00, 0x00);
    let mut frame = vec![background.to_argb_u32(); 8 * 8];
    field.draw(&mut frame, 8, 8, fill, background);

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(frame[y * 8 + x], fill.to_argb_u32(), "({}, {})", x, y);
        }
    }
    assert_eq!(frame[4], background.to_argb_u32());
}
