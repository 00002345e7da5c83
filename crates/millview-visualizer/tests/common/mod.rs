//! Headless viewport container that records what sessions do with it.

#![allow(dead_code)]

use millview_core::Move;
use millview_visualizer::visualizer::session::{FrameCallback, InputCallback, ResizeCallback};
use millview_visualizer::{
    CallbackId, InputEvent, PerspectiveCamera, RenderError, RenderSurface, Scene,
    ViewportContainer, VisualizerError,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// What surfaces created by the container have been asked to do
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub sizes: Vec<(u32, u32)>,
    pub scenes_loaded: usize,
    pub last_segment_count: usize,
    pub draws: Vec<PerspectiveCamera>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Surface,
    Fallback(String),
}

struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
    fail_draws: bool,
    fail_loads: bool,
}

impl RenderSurface for RecordingSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().sizes.push((width, height));
    }

    fn load_scene(&mut self, scene: &Scene) -> Result<(), RenderError> {
        if self.fail_loads {
            return Err(RenderError::ShaderError("link failed".to_string()));
        }
        let mut log = self.log.borrow_mut();
        log.scenes_loaded += 1;
        log.last_segment_count = scene.segment_count();
        Ok(())
    }

    fn draw(&mut self, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.fail_draws {
            return Err(RenderError::OpenGLError("lost context".to_string()));
        }
        self.log.borrow_mut().draws.push(*camera);
        Ok(())
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    frames: BTreeMap<u64, FrameCallback>,
    resize: BTreeMap<u64, ResizeCallback>,
    input: BTreeMap<u64, InputCallback>,
}

impl Registry {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct RecordingContainer {
    size: Cell<(u32, u32)>,
    backend: bool,
    fail_draws: Cell<bool>,
    fail_loads: Cell<bool>,
    children: RefCell<Vec<Child>>,
    registry: RefCell<Registry>,
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingContainer {
    pub fn new(width: u32, height: u32) -> Rc<Self> {
        Self::build(width, height, true)
    }

    /// Container whose rendering backend is unavailable
    pub fn without_backend(width: u32, height: u32) -> Rc<Self> {
        Self::build(width, height, false)
    }

    fn build(width: u32, height: u32, backend: bool) -> Rc<Self> {
        Rc::new(Self {
            size: Cell::new((width, height)),
            backend,
            fail_draws: Cell::new(false),
            fail_loads: Cell::new(false),
            children: RefCell::new(Vec::new()),
            registry: RefCell::new(Registry::default()),
            log: Rc::new(RefCell::new(SurfaceLog::default())),
        })
    }

    pub fn as_container(self: &Rc<Self>) -> Rc<dyn ViewportContainer> {
        self.clone()
    }

    pub fn fail_draws(&self, fail: bool) {
        self.fail_draws.set(fail);
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    /// Fire every frame callback once, as one display refresh would
    pub fn tick(&self) {
        let mut frames = std::mem::take(&mut self.registry.borrow_mut().frames);
        for callback in frames.values_mut() {
            callback();
        }
        let mut registry = self.registry.borrow_mut();
        for (id, callback) in frames {
            registry.frames.entry(id).or_insert(callback);
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.size.set((width, height));
        let mut resize = std::mem::take(&mut self.registry.borrow_mut().resize);
        for callback in resize.values_mut() {
            callback(width, height);
        }
        self.registry.borrow_mut().resize.append(&mut resize);
    }

    pub fn send_input(&self, event: InputEvent) {
        let mut input = std::mem::take(&mut self.registry.borrow_mut().input);
        for callback in input.values_mut() {
            callback(event);
        }
        self.registry.borrow_mut().input.append(&mut input);
    }

    pub fn frame_callbacks(&self) -> usize {
        self.registry.borrow().frames.len()
    }

    pub fn resize_listeners(&self) -> usize {
        self.registry.borrow().resize.len()
    }

    pub fn input_handlers(&self) -> usize {
        self.registry.borrow().input.len()
    }

    pub fn children(&self) -> Vec<Child> {
        self.children.borrow().clone()
    }

    pub fn draw_count(&self) -> usize {
        self.log.borrow().draws.len()
    }

    pub fn last_camera(&self) -> Option<PerspectiveCamera> {
        self.log.borrow().draws.last().copied()
    }
}

impl ViewportContainer for RecordingContainer {
    fn size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn clear(&self) {
        self.children.borrow_mut().clear();
    }

    fn backend_available(&self) -> bool {
        self.backend
    }

    fn show_fallback(&self, message: &str) {
        self.children
            .borrow_mut()
            .push(Child::Fallback(message.to_string()));
    }

    fn attach_surface(&self) -> Result<Box<dyn RenderSurface>, VisualizerError> {
        self.children.borrow_mut().push(Child::Surface);
        Ok(Box::new(RecordingSurface {
            log: Rc::clone(&self.log),
            fail_draws: self.fail_draws.get(),
            fail_loads: self.fail_loads.get(),
        }))
    }

    fn request_frames(&self, callback: FrameCallback) -> CallbackId {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next();
        registry.frames.insert(id, callback);
        CallbackId(id)
    }

    fn cancel_frames(&self, id: CallbackId) {
        self.registry.borrow_mut().frames.remove(&id.0);
    }

    fn on_resize(&self, callback: ResizeCallback) -> CallbackId {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next();
        registry.resize.insert(id, callback);
        CallbackId(id)
    }

    fn remove_resize(&self, id: CallbackId) {
        self.registry.borrow_mut().resize.remove(&id.0);
    }

    fn on_input(&self, callback: InputCallback) -> CallbackId {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next();
        registry.input.insert(id, callback);
        CallbackId(id)
    }

    fn remove_input(&self, id: CallbackId) {
        self.registry.borrow_mut().input.remove(&id.0);
    }
}

/// Moves of the reference scenario: one milling move along X, one rapid lift.
pub fn scenario_moves() -> Vec<Move> {
    vec![
        Move::milling(0.0, 0.0, 0.0),
        Move::milling(10.0, 0.0, 0.0),
        Move::rapid(10.0, 0.0, 5.0),
    ]
}

/// A closed 20 mm square pocket outline with a plunge and retract.
pub fn square_pocket() -> Vec<Move> {
    vec![
        Move::milling(0.0, 0.0, 0.0),
        Move::rapid(0.0, 0.0, 5.0),
        Move::rapid(5.0, 5.0, 5.0),
        Move::milling(5.0, 5.0, -1.0),
        Move::milling(25.0, 5.0, -1.0),
        Move::milling(25.0, 25.0, -1.0),
        Move::milling(5.0, 25.0, -1.0),
        Move::milling(5.0, 5.0, -1.0),
        Move::rapid(5.0, 5.0, 5.0),
    ]
}
