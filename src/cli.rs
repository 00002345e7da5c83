//! Command-Line Interface

use clap::{Parser, Subcommand};
use millview_settings::StylePreset;
use std::path::PathBuf;

/// MillView - interactive 3D viewer for milling tool paths
#[derive(Parser, Debug)]
#[command(name = "millview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive 3D viewer
    View {
        /// JSON move list
        moves: PathBuf,

        /// Tool diameter in millimeters
        #[arg(short = 'd', long)]
        tool_diameter: Option<f32>,

        /// Scene style: milling or legacy
        #[arg(short, long)]
        style: Option<StylePreset>,
    },

    /// Render the XY projection of the path as SVG
    Svg {
        /// JSON move list
        moves: PathBuf,

        /// Output SVG file
        output: PathBuf,

        /// Tool diameter in millimeters
        #[arg(short = 'd', long)]
        tool_diameter: Option<f32>,

        /// Image scale
        #[arg(short, long, default_value_t = millview_visualizer::visualizer::DEFAULT_PIXELS_PER_MM)]
        pixels_per_mm: f32,
    },

    /// Assemble the scene without a display and print its statistics
    Stats {
        /// JSON move list
        moves: PathBuf,

        /// Tool diameter in millimeters
        #[arg(short = 'd', long)]
        tool_diameter: Option<f32>,
    },
}
