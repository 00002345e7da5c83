use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow};
use millview_core::{Move, ToolDiameter};
use millview_settings::WindowSettings;
use millview_visualizer::{MoveVisualizer, SceneAssembler, ViewportContainer, VisualizerError};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, warn};

use crate::viewport::GtkViewportContainer;

pub const APP_ID: &str = "io.github.millview.MillView";

/// Everything the viewer window needs to show one tool path
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub moves: Vec<Move>,
    pub tool_diameter: ToolDiameter,
    pub assembler: SceneAssembler,
    pub window: WindowSettings,
    /// Shown after the window title, usually the input file name
    pub source_name: Option<String>,
}

impl ViewerOptions {
    pub fn new(moves: Vec<Move>, tool_diameter: ToolDiameter) -> Self {
        Self {
            moves,
            tool_diameter,
            assembler: SceneAssembler::default(),
            window: WindowSettings::default(),
            source_name: None,
        }
    }

    pub fn title(&self) -> String {
        match &self.source_name {
            Some(name) => format!("{} - {}", self.window.title, name),
            None => self.window.title.clone(),
        }
    }
}

/// Open the viewer window and run the GTK main loop until it closes.
pub fn run(options: ViewerOptions) -> glib::ExitCode {
    let app = Application::builder().application_id(APP_ID).build();
    let options = Rc::new(options);

    app.connect_activate(move |app| build_window(app, &options));

    // Command line arguments belong to the CLI, not to GTK
    app.run_with_args::<&str>(&[])
}

fn build_window(app: &Application, options: &ViewerOptions) {
    let window = ApplicationWindow::builder()
        .application(app)
        .title(options.title())
        .default_width(options.window.width as i32)
        .default_height(options.window.height as i32)
        .build();

    let container = GtkViewportContainer::new();
    window.set_child(Some(container.widget()));

    let host: Rc<dyn ViewportContainer> = container;
    let visualizer = Rc::new(RefCell::new(MoveVisualizer::new(
        host,
        options.assembler.clone(),
    )));

    let started = visualizer
        .borrow_mut()
        .visualize(&options.moves, options.tool_diameter);
    match started {
        Ok(stats) => info!(
            segments = stats.segments,
            rapid = stats.rapid_segments,
            milling = stats.milling_segments,
            "viewer started"
        ),
        Err(VisualizerError::BackendUnavailable(reason)) => {
            warn!(%reason, "3D view unavailable")
        }
        Err(e) => error!(error = %e, "failed to start visualization"),
    }

    window.connect_close_request(move |_| {
        visualizer.borrow_mut().dispose();
        glib::Propagation::Proceed
    });

    window.present();
}
