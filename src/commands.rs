//! Subcommand implementations

use anyhow::{Context, Result};
use millview_core::{MoveList, ToolDiameter};
use millview_settings::{Config, SettingsPersistence, StylePreset};
use millview_visualizer::{moves_to_svg, SceneAssembler, SceneStats, SvgOptions};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read and decode a JSON move list.
pub fn load_moves(path: &Path) -> Result<MoveList> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read move list {}", path.display()))?;
    let moves = MoveList::from_json_str(&json)
        .with_context(|| format!("Failed to decode move list {}", path.display()))?;
    info!(path = %path.display(), moves = moves.len(), "loaded move list");
    Ok(moves)
}

/// Load the configuration from `path`, or from the user config directory.
///
/// An explicit path must load; a broken default config only logs a warning.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match SettingsPersistence::load_default() {
            Ok(persistence) => Ok(persistence.into_config()),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable default config");
                Ok(Config::default())
            }
        },
    }
}

/// Tool diameter from the command line, falling back to the config default.
pub fn resolve_tool_diameter(arg: Option<f32>, config: &Config) -> Result<ToolDiameter> {
    let mm = arg.unwrap_or(config.scene.default_tool_diameter);
    Ok(ToolDiameter::new(mm)?)
}

pub fn assembler_for(config: &Config, style: Option<StylePreset>) -> SceneAssembler {
    match style {
        Some(preset) => SceneAssembler::from_config_with_preset(config, preset),
        None => SceneAssembler::from_config(config),
    }
}

/// Headless scene assembly.
pub fn scene_stats(moves: &MoveList, tool_diameter: ToolDiameter, config: &Config) -> SceneStats {
    let (_, stats) = assembler_for(config, None).assemble(moves, tool_diameter);
    stats
}

pub fn stats_report(stats: &SceneStats) -> Result<String> {
    serde_json::to_string_pretty(stats).context("Failed to serialize scene statistics")
}

/// Render `moves` to an SVG file.
pub fn write_svg(
    moves: &MoveList,
    tool_diameter: ToolDiameter,
    pixels_per_mm: f32,
    output: &Path,
) -> Result<()> {
    let svg = moves_to_svg(moves, tool_diameter, SvgOptions { pixels_per_mm })?;
    fs::write(output, svg).with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), "wrote SVG");
    Ok(())
}
