//! # Viewport Sessions
//!
//! A [`ViewportSession`] binds one assembled scene to a container: it owns
//! the camera, orbit controls and drawing surface, and registers a frame
//! callback, a resize listener and an input handler with the container.
//!
//! Lifecycle: `Uninitialized → Running → Disposed`. Disposal cancels the
//! frame callback and removes both listeners; it is idempotent and also runs
//! on drop. Callbacks hold only weak references to the session state, so a
//! callback that fires after disposal does nothing.

use super::camera::PerspectiveCamera;
use super::controls::{InputEvent, OrbitControls};
use super::scene::{Scene, SceneAssembler, SceneStats};
use crate::error::{RenderError, Result, VisualizerError};
use millview_core::{shared, Move, Shared, ToolDiameter, UiCallback, UiDataCallback, WeakShared};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Message shown in place of the viewport when no GL backend is available
pub const FALLBACK_MESSAGE: &str =
    "Your graphics card does not seem to support OpenGL 3.3. The tool path cannot be displayed.";

/// Handle for a callback registered with a [`ViewportContainer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u64);

pub type FrameCallback = UiCallback;
pub type ResizeCallback = Box<dyn FnMut(u32, u32)>;
pub type InputCallback = UiDataCallback<InputEvent>;

/// Host element a session renders into.
///
/// Implementations are handles to UI objects and use interior mutability,
/// so every method takes `&self`.
pub trait ViewportContainer {
    /// Current size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Remove all children (previous surface or fallback message)
    fn clear(&self);

    /// Whether a hardware-accelerated drawing surface can be created
    fn backend_available(&self) -> bool;

    /// Display a static message instead of a drawing surface
    fn show_fallback(&self, message: &str);

    /// Insert a new drawing surface and return it
    fn attach_surface(&self) -> Result<Box<dyn RenderSurface>>;

    /// Call `callback` once per display refresh until cancelled
    fn request_frames(&self, callback: FrameCallback) -> CallbackId;

    fn cancel_frames(&self, id: CallbackId);

    /// Call `callback` with the new size whenever the container is resized
    fn on_resize(&self, callback: ResizeCallback) -> CallbackId;

    fn remove_resize(&self, id: CallbackId);

    /// Forward pointer input to `callback`
    fn on_input(&self, callback: InputCallback) -> CallbackId;

    fn remove_input(&self, id: CallbackId);
}

/// Drawing surface created by a container
pub trait RenderSurface {
    /// Match the drawing buffer to the container size
    fn set_size(&mut self, width: u32, height: u32);

    /// Replace the scene drawn by this surface
    fn load_scene(&mut self, scene: &Scene) -> std::result::Result<(), RenderError>;

    /// Draw the loaded scene from `camera`
    fn draw(&mut self, camera: &PerspectiveCamera) -> std::result::Result<(), RenderError>;
}

/// Lifecycle state of a [`ViewportSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Running,
    Disposed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Disposed => "disposed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State reachable from container callbacks
struct SessionInner {
    camera: PerspectiveCamera,
    controls: OrbitControls,
    surface: Box<dyn RenderSurface>,
    viewport: (u32, u32),
    frames: u64,
    draw_failed: bool,
}

impl SessionInner {
    fn tick(&mut self) {
        self.controls.update(&mut self.camera);
        match self.surface.draw(&self.camera) {
            Ok(()) => {
                self.frames += 1;
                self.draw_failed = false;
            }
            Err(e) => {
                // Log once per failure streak; the loop keeps running
                if !self.draw_failed {
                    error!(error = %e, "failed to draw frame");
                }
                self.draw_failed = true;
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        if !self.camera.update_aspect_ratio(width, height) {
            debug!(width, height, "zero-height resize, keeping aspect ratio");
        }
        self.surface.set_size(width, height);
    }

    fn input(&mut self, event: InputEvent) {
        self.controls
            .handle_input(event, &self.camera, self.viewport.1);
    }
}

#[derive(Debug, Default)]
struct Registrations {
    frame: Option<CallbackId>,
    resize: Option<CallbackId>,
    input: Option<CallbackId>,
}

/// One live visualization bound to a container.
pub struct ViewportSession {
    container: Rc<dyn ViewportContainer>,
    state: SessionState,
    inner: Option<Shared<SessionInner>>,
    registrations: Registrations,
    stats: SceneStats,
}

impl ViewportSession {
    pub fn new(container: Rc<dyn ViewportContainer>) -> Self {
        Self {
            container,
            state: SessionState::Uninitialized,
            inner: None,
            registrations: Registrations::default(),
            stats: SceneStats::default(),
        }
    }

    /// Build the scene for `moves`, attach a surface and start the render loop.
    ///
    /// When the container has no rendering backend the fallback message is
    /// shown, nothing is attached and [`VisualizerError::BackendUnavailable`]
    /// is returned.
    pub fn start(
        &mut self,
        moves: &[Move],
        tool_diameter: ToolDiameter,
        assembler: &SceneAssembler,
    ) -> Result<SceneStats> {
        if self.state != SessionState::Uninitialized {
            return Err(VisualizerError::InvalidState {
                expected: SessionState::Uninitialized.as_str(),
                found: self.state.as_str(),
            });
        }

        self.container.clear();

        if !self.container.backend_available() {
            warn!("rendering backend unavailable, showing fallback message");
            self.container.show_fallback(FALLBACK_MESSAGE);
            self.state = SessionState::Disposed;
            return Err(VisualizerError::BackendUnavailable(
                "no OpenGL context could be created".to_string(),
            ));
        }

        let (scene, stats) = assembler.assemble(moves, tool_diameter);

        let mut surface = match self.container.attach_surface() {
            Ok(surface) => surface,
            Err(e) => {
                warn!(error = %e, "could not attach drawing surface, showing fallback message");
                self.container.clear();
                self.container.show_fallback(FALLBACK_MESSAGE);
                self.state = SessionState::Disposed;
                return Err(e);
            }
        };

        let (width, height) = self.container.size();
        let mut camera = assembler.camera(width, height);
        let mut controls = assembler.controls();
        controls.update(&mut camera);

        surface.set_size(width, height);
        if let Err(e) = surface.load_scene(&scene) {
            error!(
                error = %e,
                "failed to load scene into drawing surface, showing fallback message"
            );
            drop(surface);
            self.container.clear();
            self.container.show_fallback(FALLBACK_MESSAGE);
            self.state = SessionState::Disposed;
            return Err(e.into());
        }

        let inner = shared(SessionInner {
            camera,
            controls,
            surface,
            viewport: (width, height),
            frames: 0,
            draw_failed: false,
        });

        let weak = Rc::downgrade(&inner);
        let resize_weak = weak.clone();
        self.registrations.resize = Some(self.container.on_resize(Box::new(move |w, h| {
            with_inner(&resize_weak, |inner| inner.resize(w, h));
        })));
        let input_weak = weak.clone();
        self.registrations.input = Some(self.container.on_input(Box::new(move |event| {
            with_inner(&input_weak, |inner| inner.input(event));
        })));
        self.registrations.frame = Some(self.container.request_frames(Box::new(move || {
            with_inner(&weak, SessionInner::tick);
        })));

        self.inner = Some(inner);
        self.stats = stats;
        self.state = SessionState::Running;
        debug!(width, height, segments = stats.segments, "viewport session started");

        Ok(stats)
    }

    /// Stop the render loop and detach from the container. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == SessionState::Disposed {
            return;
        }

        if let Some(id) = self.registrations.frame.take() {
            self.container.cancel_frames(id);
        }
        if let Some(id) = self.registrations.resize.take() {
            self.container.remove_resize(id);
        }
        if let Some(id) = self.registrations.input.take() {
            self.container.remove_input(id);
        }
        self.inner = None;

        debug!(from = %self.state, "viewport session disposed");
        self.state = SessionState::Disposed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Current camera, while running
    pub fn camera(&self) -> Option<PerspectiveCamera> {
        self.inner.as_ref().map(|inner| inner.borrow().camera)
    }

    /// Pending rotation of the controls, while running
    pub fn pending_rotation(&self) -> Option<(f32, f32)> {
        self.inner
            .as_ref()
            .map(|inner| inner.borrow().controls.pending_rotation())
    }

    /// Frames drawn successfully so far
    pub fn frames_drawn(&self) -> u64 {
        self.inner
            .as_ref()
            .map(|inner| inner.borrow().frames)
            .unwrap_or(0)
    }
}

impl Drop for ViewportSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ViewportSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportSession")
            .field("state", &self.state)
            .field("registrations", &self.registrations)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Run `f` on the session state if the session is still alive.
fn with_inner<T>(weak: &WeakShared<T>, f: impl FnOnce(&mut T)) {
    if let Some(inner) = weak.upgrade() {
        // Re-entrant callbacks (e.g. a resize emitted while drawing) are dropped
        match inner.try_borrow_mut() {
            Ok(mut inner) => f(&mut inner),
            Err(_) => debug!("session busy, dropping re-entrant callback"),
        }
    }
}

/// Owns the current session of one container.
///
/// Each [`visualize`](Self::visualize) call disposes the previous session
/// before the next one claims the container.
pub struct MoveVisualizer {
    container: Rc<dyn ViewportContainer>,
    assembler: SceneAssembler,
    session: Option<ViewportSession>,
}

impl MoveVisualizer {
    pub fn new(container: Rc<dyn ViewportContainer>, assembler: SceneAssembler) -> Self {
        Self {
            container,
            assembler,
            session: None,
        }
    }

    /// Replace the current view with one showing `moves`.
    pub fn visualize(&mut self, moves: &[Move], tool_diameter: ToolDiameter) -> Result<SceneStats> {
        if let Some(mut previous) = self.session.take() {
            previous.dispose();
        }

        let mut session = ViewportSession::new(Rc::clone(&self.container));
        let stats = session.start(moves, tool_diameter, &self.assembler)?;
        self.session = Some(session);
        Ok(stats)
    }

    pub fn session(&self) -> Option<&ViewportSession> {
        self.session.as_ref()
    }

    pub fn assembler(&self) -> &SceneAssembler {
        &self.assembler
    }

    /// Style or settings changes apply from the next `visualize` call.
    pub fn set_assembler(&mut self, assembler: SceneAssembler) {
        self.assembler = assembler;
    }

    pub fn dispose(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose();
        }
    }
}

/// Start a session for `moves` in `container` with the default scene setup.
pub fn visualize(
    container: Rc<dyn ViewportContainer>,
    moves: &[Move],
    tool_diameter: ToolDiameter,
) -> Result<ViewportSession> {
    let mut session = ViewportSession::new(container);
    session.start(moves, tool_diameter, &SceneAssembler::default())?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_inner_skips_busy_and_dropped_state() {
        let state = shared(0u32);
        let weak = Rc::downgrade(&state);

        with_inner(&weak, |n| *n += 1);
        assert_eq!(*state.borrow(), 1);

        {
            let _held = state.borrow_mut();
            with_inner(&weak, |n| *n += 1);
        }
        assert_eq!(*state.borrow(), 1);

        drop(state);
        let mut ran = false;
        with_inner(&weak, |_| ran = true);
        assert!(!ran);
    }
}
