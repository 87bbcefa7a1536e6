//! ApplicationHandler and window management
//!
//! Wires the three external event sources into the driver: occlusion as the
//! visibility detector, resize/scale changes as the size-change detector,
//! and a paced redraw chain as the frame clock. The driver itself never
//! sees a winit type.

use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::Window;

use flickerfield::driver::Driver;
use flickerfield::font;
use flickerfield::GridConfig;

use super::perf::FrameStats;

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

/// Display-frame pacing target.
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Upper bound on the per-frame delta. A window resumed after a long pause
/// gets one clamped step instead of reseeding the whole field at once.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

pub struct App {
    driver: Driver,
    explicit_size: Option<(u32, u32)>,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    /// Physical pixel size the surface was last configured for.
    surface_size: (u32, u32),
    last_frame: Option<Instant>,
    stats: FrameStats,
}

impl App {
    pub fn new(config: GridConfig) -> Self {
        let explicit_size = match (config.width, config.height) {
            (None, None) => None,
            (w, h) => Some((w.unwrap_or(DEFAULT_WIDTH), h.unwrap_or(DEFAULT_HEIGHT))),
        };
        let driver = Driver::new(config, font::load());
        Self {
            driver,
            explicit_size,
            window: None,
            context: None,
            surface: None,
            surface_size: (0, 0),
            last_frame: None,
            stats: FrameStats::default(),
        }
    }

    /// Size-change path: reconfigure the surface for the new physical
    /// resolution and rebuild the driver's lattice at the logical size.
    fn handle_resize(&mut self, physical_w: u32, physical_h: u32, scale: f64) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let (Some(w), Some(h)) = (NonZeroU32::new(physical_w), NonZeroU32::new(physical_h)) else {
            return;
        };
        if let Err(e) = surface.resize(w, h) {
            tracing::error!("Failed to resize surface: {}", e);
            return;
        }
        self.surface_size = (physical_w, physical_h);

        let logical_w = (physical_w as f64 / scale).round() as u32;
        let logical_h = (physical_h as f64 / scale).round() as u32;
        self.driver.rebuild(logical_w, logical_h, scale);
    }

    fn redraw(&mut self) {
        if self.surface_size.0 == 0 || self.surface_size.1 == 0 {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = match self.last_frame {
            Some(prev) => now.duration_since(prev).min(MAX_FRAME_DELTA).as_secs_f32(),
            None => 0.0,
        };

        let mut buffer = match surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::error!("Failed to get surface buffer: {}", e);
                return;
            }
        };

        let painted = self.driver.tick(
            dt,
            &mut buffer,
            self.surface_size.0 as usize,
            self.surface_size.1 as usize,
        );
        if !painted {
            return;
        }

        if let Err(e) = buffer.present() {
            tracing::error!("Failed to present buffer: {}", e);
            return;
        }
        self.last_frame = Some(now);
        self.stats.record(now.elapsed());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let (width, height) = self.explicit_size.unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
            let window_attributes = Window::default_attributes()
                .with_title("flickerfield")
                .with_inner_size(LogicalSize::new(width, height));

            let window = Rc::new(event_loop.create_window(window_attributes).unwrap());
            let context = Context::new(Rc::clone(&window)).unwrap();
            let surface = Surface::new(&context, Rc::clone(&window)).unwrap();

            self.window = Some(Rc::clone(&window));
            self.context = Some(context);
            self.surface = Some(surface);

            let size = window.inner_size();
            self.handle_resize(size.width, size.height, window.scale_factor());
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(size.width, size.height, window.scale_factor());
                window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = window.inner_size();
                self.handle_resize(size.width, size.height, scale_factor);
                window.request_redraw();
            }
            WindowEvent::Occluded(occluded) => {
                self.driver.set_visible(!occluded);
                if !occluded {
                    // Fresh delta baseline after a hidden stretch
                    self.last_frame = None;
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.driver.is_visible() || self.surface_size.0 == 0 || self.surface_size.1 == 0 {
            // Park until the visibility or size detector wakes us
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }
        let Some(window) = &self.window else {
            return;
        };

        let now = Instant::now();
        let due = match self.last_frame {
            Some(prev) => prev + FRAME_INTERVAL,
            None => now,
        };
        if now >= due {
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(due));
        }
    }
}
