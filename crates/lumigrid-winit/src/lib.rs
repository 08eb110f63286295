//! Winit window driver for lumigrid.
//!
//! Shows the light overlay in a native window using:
//! - [`winit`] for window creation and input events
//! - [`softbuffer`] for presenting the CPU-rendered pixels
//!
//! The overlay is drawn into a [`PixelSurface`] by the core [`Renderer`];
//! transparent pixels are composited over [`WinitConfig::background`]
//! before presentation. Redraws happen only when the window asks for one
//! or when the [`Scene`] reports a change.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lumigrid_core::{CellRegistry, CellSpec};
//! use lumigrid_winit::{Scene, WinitConfig, WinitDriver};
//!
//! struct One;
//!
//! impl Scene for One {
//!     fn init(&mut self, cells: &mut CellRegistry) {
//!         cells.create_cell(CellSpec::new(0, 0, 40, "lamp", false));
//!         cells.set_luminance("lamp", 1.0);
//!     }
//! }
//!
//! WinitDriver::new(WinitConfig::default()).run(One).unwrap();
//! ```

mod input;

pub use input::Input;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use lumigrid_core::{CellRegistry, PixelSurface, Renderer, Rgba, SurfaceError};

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// What runs inside the window. Every hook may mutate the registry and
/// returns `true` when the overlay should be redrawn.
pub trait Scene {
    /// Populate the registry before the first redraw.
    fn init(&mut self, cells: &mut CellRegistry);

    /// Keyboard or pointer input.
    fn input(&mut self, _cells: &mut CellRegistry, _input: Input) -> bool {
        false
    }

    /// Called every [`WinitConfig::tick`] when set.
    fn tick(&mut self, _cells: &mut CellRegistry) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the winit driver.
pub struct WinitConfig {
    /// Window title.
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Colour shown where no cell is drawn.
    pub background: Rgba,
    /// Interval between [`Scene::tick`] calls. `None` disables ticking.
    pub tick: Option<Duration>,
    /// Close the window on Escape.
    pub exit_on_escape: bool,
}

impl Default for WinitConfig {
    fn default() -> Self {
        Self {
            title: "lumigrid".into(),
            width: 480,
            height: 360,
            background: Rgba::from_rgb(24, 32, 48),
            tick: None,
            exit_on_escape: true,
        }
    }
}

// ---------------------------------------------------------------------------
// WinitDriver
// ---------------------------------------------------------------------------

/// Winit-based window driver. Owns the main-thread event loop.
pub struct WinitDriver {
    config: WinitConfig,
}

impl WinitDriver {
    pub fn new(config: WinitConfig) -> Self {
        Self { config }
    }

    /// Open the window and run `scene` until the window closes.
    pub fn run<S: Scene>(self, scene: S) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        let mut app = WinitApp::new(self.config, scene);
        event_loop.run_app(&mut app)?;
        match app.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// WinitApp — ApplicationHandler
// ---------------------------------------------------------------------------

type Presenter = softbuffer::Surface<Arc<Window>, Arc<Window>>;

struct WinitApp<S: Scene> {
    config: WinitConfig,
    scene: S,
    cells: CellRegistry,
    state: Option<WinitState>,
    next_tick: Option<Instant>,
    fatal: Option<Box<dyn std::error::Error>>,
}

struct WinitState {
    window: Arc<Window>,
    /// `None` when softbuffer could not attach; the renderer is detached too.
    presenter: Option<Presenter>,
    renderer: Renderer<PixelSurface>,
    pixel_width: u32,
    pixel_height: u32,
    cursor: Option<(f64, f64)>,
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

fn attach_presenter(window: &Arc<Window>) -> Result<Presenter, SurfaceError> {
    let context = softbuffer::Context::new(window.clone())
        .map_err(|e| SurfaceError::Backend(e.to_string()))?;
    softbuffer::Surface::new(&context, window.clone())
        .map_err(|e| SurfaceError::Backend(e.to_string()))
}

impl<S: Scene> WinitApp<S> {
    fn new(config: WinitConfig, scene: S) -> Self {
        Self {
            config,
            scene,
            cells: CellRegistry::new(),
            state: None,
            next_tick: None,
            fatal: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }

    fn render(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let (width, height) = (state.pixel_width, state.pixel_height);
        if width == 0 || height == 0 {
            return;
        }

        if let Some(surface) = state.renderer.surface_mut() {
            surface.set_layout_size(width, height);
        }
        state.renderer.redraw(&self.cells);

        let (Some(presenter), Some(pixels)) = (state.presenter.as_mut(), state.renderer.surface())
        else {
            return;
        };
        let mut buf = match presenter.buffer_mut() {
            Ok(b) => b,
            Err(err) => {
                warn!("softbuffer buffer unavailable: {err}");
                return;
            }
        };
        pixels.composite_into(&mut buf, width as usize, height as usize, self.config.background);
        if let Err(err) = buf.present() {
            warn!("present failed: {err}");
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, input: Input) {
        if input == Input::Escape && self.config.exit_on_escape {
            event_loop.exit();
            return;
        }
        if self.scene.input(&mut self.cells, input) {
            self.request_redraw();
        }
    }
}

impl<S: Scene> ApplicationHandler for WinitApp<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(true);

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(err) => {
                error!("failed to create window: {err}");
                self.fatal = Some(Box::new(err));
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (presenter, renderer) = match attach_presenter(&window) {
            Ok(mut presenter) => {
                if let Err(err) = presenter.resize(non_zero(size.width), non_zero(size.height)) {
                    warn!("initial surface resize failed: {err}");
                }
                let pixels = PixelSurface::new(size.width, size.height);
                (Some(presenter), Renderer::new(pixels))
            }
            Err(err) => (None, Renderer::attach(Err(err))),
        };

        self.state = Some(WinitState {
            window,
            presenter,
            renderer,
            pixel_width: size.width,
            pixel_height: size.height,
            cursor: None,
        });

        self.scene.init(&mut self.cells);
        debug!("scene initialised with {} cells", self.cells.len());
        self.next_tick = self.config.tick.map(|d| Instant::now() + d);
        self.request_redraw();
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        let StartCause::ResumeTimeReached { .. } = cause else {
            return;
        };
        let Some(interval) = self.config.tick else {
            return;
        };
        self.next_tick = Some(Instant::now() + interval);
        if self.scene.tick(&mut self.cells) {
            self.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match self.next_tick {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(state) = self.state.as_mut() {
                    state.pixel_width = width;
                    state.pixel_height = height;
                    if let Some(presenter) = state.presenter.as_mut() {
                        if let Err(err) = presenter.resize(non_zero(width), non_zero(height)) {
                            warn!("surface resize failed: {err}");
                        }
                    }
                }
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => self.render(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = input::translate_keyboard(&event) {
                    self.dispatch(event_loop, input);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = self.state.as_ref().and_then(|s| {
                    input::pixel_to_logical(position, s.pixel_width, s.pixel_height)
                });
                if let Some(state) = self.state.as_mut() {
                    state.cursor = logical;
                }
                if let Some((x, y)) = logical {
                    self.dispatch(event_loop, Input::PointerMoved { x, y });
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if let Some(state) = self.state.as_mut() {
                    state.cursor = None;
                }
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let cursor = self.state.as_ref().and_then(|s| s.cursor);
                if let Some(input) = input::translate_mouse_button(btn_state, button, cursor) {
                    self.dispatch(event_loop, input);
                }
            }

            _ => {}
        }
    }
}
