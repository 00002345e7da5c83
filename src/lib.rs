//! # MillView
//!
//! Interactive 3D viewer for milling tool paths.
//!
//! ## Architecture
//!
//! MillView is organized as a workspace with multiple crates:
//!
//! 1. **millview-core** - Move list data model, units, colors, errors
//! 2. **millview-settings** - Configuration, style presets, persistence
//! 3. **millview-visualizer** - Scene assembly, camera and controls, sessions, OpenGL renderer, SVG export
//! 4. **millview-ui** - GTK4 viewport container and viewer window
//! 5. **millview** - Command line binary that integrates all crates

pub mod cli;
pub mod commands;

pub use millview_core::{Color, Move, MoveList, RenderUnit, ToolDiameter};
pub use millview_settings::{Config, SceneStyle, SettingsPersistence, StylePreset};
pub use millview_visualizer::visualizer;
pub use millview_visualizer::{
    moves_to_svg, MoveVisualizer, SceneAssembler, SceneStats, SvgOptions, ViewportContainer,
    ViewportSession, VisualizerError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `default_level` otherwise
pub fn init_logging(default_level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    // In Windows GUI mode (release builds), log to a file instead of stdout
    #[cfg(all(target_os = "windows", not(debug_assertions)))]
    {
        use std::fs::OpenOptions;

        let log_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let log_file = log_dir.join("millview.log");

        let file = OpenOptions::new().create(true).append(true).open(&log_file)?;
        let fmt_layer = fmt::layer()
            .with_writer(file)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    #[cfg(not(all(target_os = "windows", not(debug_assertions))))]
    {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
