//! Animation driver tests
//!
//! The driver runs headless here: ticks paint into a plain vec the same way
//! they paint into the window surface.

mod common;

use common::test_config;
use flickerfield::driver::Driver;
use flickerfield::font::MaskFont;

fn test_driver() -> Driver {
    Driver::new(test_config(), MaskFont::Bitmap)
}

fn frame_buffer(w: usize, h: usize) -> Vec<u32> {
    vec![0u32; w * h]
}

#[test]
fn test_tick_before_first_rebuild_is_noop() {
    let mut driver = test_driver();
    let mut frame = frame_buffer(100, 60);
    assert!(!driver.tick(0.016, &mut frame, 100, 60));
    assert_eq!(driver.frames(), 0);
    assert!(frame.iter().all(|&px| px == 0), "frame untouched");
}

#[test]
fn test_visibility_gates_frames() {
    let mut driver = test_driver();
    driver.rebuild(100, 60, 1.0);
    let mut frame = frame_buffer(100, 60);

    assert!(driver.tick(0.016, &mut frame, 100, 60));
    assert_eq!(driver.frames(), 1);

    driver.set_visible(false);
    for _ in 0..3 {
        assert!(!driver.tick(0.016, &mut frame, 100, 60));
    }
    assert_eq!(driver.frames(), 1, "frame counter frozen while hidden");

    driver.set_visible(true);
    assert!(driver.tick(0.016, &mut frame, 100, 60));
    assert_eq!(driver.frames(), 2);
}

#[test]
fn test_hidden_tick_does_not_touch_frame() {
    let mut driver = test_driver();
    driver.rebuild(100, 60, 1.0);
    driver.set_visible(false);
    let mut frame = frame_buffer(100, 60);
    driver.tick(0.016, &mut frame, 100, 60);
    assert!(frame.iter().all(|&px| px == 0));
}

#[test]
fn test_rebuild_replaces_geometry() {
    let mut driver = test_driver();
    driver.rebuild(800, 600, 1.0);
    let a = driver.geometry().unwrap();
    assert_eq!(a.cols, 80);

    driver.rebuild(403, 207, 1.0);
    let b = driver.geometry().unwrap();
    assert!(b.cols as u32 * b.pitch() <= 403);
    assert!(b.rows as u32 * b.pitch() <= 207);
    assert_eq!(
        driver.field().unwrap().kinds().len(),
        b.cols * b.rows,
        "field sized for the new lattice"
    );
}

#[test]
fn test_rebuild_same_size_reuses_mask() {
    let mut driver = test_driver();
    driver.rebuild(200, 120, 1.0);
    driver.rebuild(200, 120, 1.0);
    assert_eq!(driver.mask_builds(), 1);

    driver.rebuild(300, 120, 1.0);
    assert_eq!(driver.mask_builds(), 2, "size change re-keys the mask");
}

#[test]
fn test_seeded_drivers_are_deterministic() {
    let mut a = test_driver();
    let mut b = test_driver();
    a.rebuild(200, 120, 1.0);
    b.rebuild(200, 120, 1.0);

    let mut frame_a = frame_buffer(200, 120);
    let mut frame_b = frame_buffer(200, 120);
    for _ in 0..30 {
        a.tick(0.033, &mut frame_a, 200, 120);
        b.tick(0.033, &mut frame_b, 200, 120);
    }

    assert_eq!(a.field().unwrap().opacities(), b.field().unwrap().opacities());
    assert_eq!(frame_a, frame_b);
}

#[test]
fn test_driver_normalizes_config() {
    let mut config = test_config();
    config.text_min_opacity = 0.9;
    config.text_opacity = 0.5;
    config.square_size = 0;
    let driver = Driver::new(config, MaskFont::Bitmap);
    assert_eq!(driver.config().text_min_opacity, 0.5);
    assert_eq!(driver.config().square_size, 1);
}

#[test]
fn test_tick_paints_background() {
    let mut driver = test_driver();
    driver.rebuild(100, 60, 1.0);
    let mut frame = frame_buffer(100, 60);
    driver.tick(0.016, &mut frame, 100, 60);

    let bg = driver.palette().background.to_argb_u32();
    // Default config: white backdrop, mostly-translucent cells. At minimum
    // the gap pixels must carry the background color.
    assert!(frame.iter().any(|&px| px == bg));
    assert!(frame.iter().all(|&px| px >> 24 == 0xFF), "opaque output");
}
