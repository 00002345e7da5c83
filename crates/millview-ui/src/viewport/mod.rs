//! # GTK Viewport
//!
//! [`GtkViewportContainer`] implements the visualizer's container contract on
//! top of a `gtk4::Box`: drawing surfaces are `GLArea`s, frame callbacks are
//! widget tick callbacks, and pointer gestures become orbit control input.

mod gl_loader;
mod handlers;
mod input;

use gtk4::prelude::*;
use gtk4::{EventControllerScroll, EventControllerScrollFlags, GLArea, GestureDrag, Label};
use millview_visualizer::{
    CallbackId, InputEvent, PerspectiveCamera, RenderError, RenderSurface, Scene, SceneRenderer,
    ViewportContainer,
};
use millview_visualizer::visualizer::session::{FrameCallback, InputCallback, ResizeCallback};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, error};

use handlers::HandlerRegistry;
use input::{scroll_event, DragTracker};

type ResizeHandlers = Rc<RefCell<HandlerRegistry<dyn FnMut(u32, u32)>>>;
type InputHandlers = Rc<RefCell<HandlerRegistry<dyn FnMut(InputEvent)>>>;

fn to_pixels(value: i32) -> u32 {
    value.max(0) as u32
}

/// Viewport host backed by a vertical `gtk4::Box`.
pub struct GtkViewportContainer {
    widget: gtk4::Box,
    size: Rc<Cell<(u32, u32)>>,
    ticks: RefCell<BTreeMap<u64, gtk4::TickCallbackId>>,
    next_tick: Cell<u64>,
    resize: ResizeHandlers,
    input: InputHandlers,
}

impl GtkViewportContainer {
    pub fn new() -> Rc<Self> {
        let widget = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Vertical)
            .hexpand(true)
            .vexpand(true)
            .build();

        Rc::new(Self {
            widget,
            size: Rc::new(Cell::new((0, 0))),
            ticks: RefCell::new(BTreeMap::new()),
            next_tick: Cell::new(0),
            resize: Rc::new(RefCell::new(HandlerRegistry::default())),
            input: Rc::new(RefCell::new(HandlerRegistry::default())),
        })
    }

    pub fn widget(&self) -> &gtk4::Box {
        &self.widget
    }

    fn connect_resize(&self, gl_area: &GLArea) {
        let size = Rc::clone(&self.size);
        let resize = Rc::clone(&self.resize);
        gl_area.connect_resize(move |_area, width, height| {
            let (width, height) = (to_pixels(width), to_pixels(height));
            size.set((width, height));
            HandlerRegistry::dispatch(&resize, |handler| handler(width, height));
        });
    }

    fn connect_input(&self, gl_area: &GLArea) {
        let tracker = Rc::new(Cell::new(DragTracker::default()));

        let gesture_drag = GestureDrag::new();
        let tracker_begin = Rc::clone(&tracker);
        gesture_drag.connect_drag_begin(move |_, _, _| {
            let mut t = tracker_begin.get();
            t.begin();
            tracker_begin.set(t);
        });

        let input_drag = Rc::clone(&self.input);
        gesture_drag.connect_drag_update(move |gesture, dx, dy| {
            let shift = gesture
                .current_event()
                .map(|event| {
                    event
                        .modifier_state()
                        .contains(gtk4::gdk::ModifierType::SHIFT_MASK)
                })
                .unwrap_or(false);

            let mut t = tracker.get();
            let event = t.update((dx, dy), shift);
            tracker.set(t);

            if let Some(event) = event {
                HandlerRegistry::dispatch(&input_drag, |handler| handler(event));
            }
        });
        gl_area.add_controller(gesture_drag);

        let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
        let input_scroll = Rc::clone(&self.input);
        scroll.connect_scroll(move |_controller, _dx, dy| {
            if let Some(event) = scroll_event(dy) {
                HandlerRegistry::dispatch(&input_scroll, |handler| handler(event));
            }
            glib::Propagation::Stop
        });
        gl_area.add_controller(scroll);
    }

    fn connect_render(&self, gl_area: &GLArea, state: &Rc<RefCell<SurfaceState>>) {
        let state = Rc::clone(state);
        let widget = self.widget.downgrade();
        gl_area.connect_render(move |area, _context| {
            if let Some(err) = area.error() {
                error!(error = %err, "GLArea error");
                let mut state = state.borrow_mut();
                if !state.failed {
                    state.failed = true;
                    if let Some(widget) = widget.upgrade() {
                        glib::idle_add_local_once(move || {
                            replace_with_fallback(&widget, millview_visualizer::FALLBACK_MESSAGE);
                        });
                    }
                }
                return glib::Propagation::Stop;
            }

            let scale = area.scale_factor().max(1);
            let fallback_size = (to_pixels(area.width() * scale), to_pixels(area.height() * scale));

            let mut state = state.borrow_mut();
            if let Err(e) = state.render(fallback_size) {
                if !state.failed {
                    error!(error = %e, "failed to render tool path scene");
                }
                state.failed = true;
            }
            glib::Propagation::Stop
        });
    }
}

fn clear_children(widget: &gtk4::Box) {
    while let Some(child) = widget.first_child() {
        widget.remove(&child);
    }
}

fn replace_with_fallback(widget: &gtk4::Box, message: &str) {
    clear_children(widget);
    let label = Label::builder()
        .label(message)
        .wrap(true)
        .justify(gtk4::Justification::Center)
        .hexpand(true)
        .vexpand(true)
        .build();
    widget.append(&label);
}

impl ViewportContainer for GtkViewportContainer {
    fn size(&self) -> (u32, u32) {
        match self.size.get() {
            (0, 0) => (to_pixels(self.widget.width()), to_pixels(self.widget.height())),
            size => size,
        }
    }

    fn clear(&self) {
        clear_children(&self.widget);
    }

    fn backend_available(&self) -> bool {
        gl_loader::gl_available()
    }

    fn show_fallback(&self, message: &str) {
        replace_with_fallback(&self.widget, message);
    }

    fn attach_surface(&self) -> millview_visualizer::Result<Box<dyn RenderSurface>> {
        let gl_area = GLArea::builder().hexpand(true).vexpand(true).build();
        gl_area.set_required_version(3, 3);
        gl_area.set_has_depth_buffer(true);

        let state = Rc::new(RefCell::new(SurfaceState::default()));
        self.connect_render(&gl_area, &state);
        self.connect_resize(&gl_area);
        self.connect_input(&gl_area);

        self.widget.append(&gl_area);
        debug!("attached GLArea drawing surface");

        Ok(Box::new(GtkSurface { gl_area, state }))
    }

    fn request_frames(&self, callback: FrameCallback) -> CallbackId {
        let callback = RefCell::new(callback);
        let tick = self.widget.add_tick_callback(move |_widget, _clock| {
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (*callback)();
            }
            glib::ControlFlow::Continue
        });

        let id = self.next_tick.get() + 1;
        self.next_tick.set(id);
        self.ticks.borrow_mut().insert(id, tick);
        CallbackId(id)
    }

    fn cancel_frames(&self, id: CallbackId) {
        if let Some(tick) = self.ticks.borrow_mut().remove(&id.0) {
            tick.remove();
        }
    }

    fn on_resize(&self, callback: ResizeCallback) -> CallbackId {
        self.resize.borrow_mut().insert(callback)
    }

    fn remove_resize(&self, id: CallbackId) {
        self.resize.borrow_mut().remove(id);
    }

    fn on_input(&self, callback: InputCallback) -> CallbackId {
        self.input.borrow_mut().insert(callback)
    }

    fn remove_input(&self, id: CallbackId) {
        self.input.borrow_mut().remove(id);
    }
}

/// Render state shared between a [`GtkSurface`] and its `GLArea` render signal
#[derive(Default)]
struct SurfaceState {
    renderer: Option<SceneRenderer>,
    pending_scene: Option<Scene>,
    camera: Option<PerspectiveCamera>,
    size: (u32, u32),
    failed: bool,
}

impl SurfaceState {
    /// Runs inside the render signal, with the area's context current.
    fn render(&mut self, fallback_size: (u32, u32)) -> Result<(), RenderError> {
        if self.renderer.is_none() {
            let gl = unsafe { glow::Context::from_loader_function(gl_loader::load_gl_func) };
            self.renderer = Some(SceneRenderer::new(gl)?);
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        if let Some(scene) = self.pending_scene.take() {
            renderer.upload_scene(&scene)?;
        }

        if let Some(camera) = self.camera.as_ref() {
            let (width, height) = match self.size {
                (0, _) | (_, 0) => fallback_size,
                size => size,
            };
            renderer.render(camera, width, height)?;
        }
        Ok(())
    }
}

/// `GLArea` drawing surface.
///
/// Draw requests only record the camera and queue a render; GTK invokes the
/// render signal with the area's GL context current.
pub struct GtkSurface {
    gl_area: GLArea,
    state: Rc<RefCell<SurfaceState>>,
}

impl GtkSurface {
    pub fn gl_area(&self) -> &GLArea {
        &self.gl_area
    }
}

impl RenderSurface for GtkSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().size = (width, height);
    }

    fn load_scene(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.state.borrow_mut().pending_scene = Some(scene.clone());
        self.gl_area.queue_render();
        Ok(())
    }

    fn draw(&mut self, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        if state.failed {
            return Err(RenderError::OpenGLError(
                "drawing surface is unusable".to_string(),
            ));
        }
        state.camera = Some(*camera);
        drop(state);
        self.gl_area.queue_render();
        Ok(())
    }
}

impl Drop for GtkSurface {
    fn drop(&mut self) {
        // GL resources must be released with the area's context current
        if self.gl_area.is_realized() {
            self.gl_area.make_current();
        }
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.renderer = None;
            state.pending_scene = None;
            state.camera = None;
        }
    }
}
