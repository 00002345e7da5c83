//! Top-down SVG rendering of a move list
//!
//! Draws the XY projection of the path (Z is ignored): a disc of tool
//! diameter at every turning point, a tool-wide black stroke plus a thin
//! blue direction line for every move, a 1 mm grid over the path extents
//! with every tenth line dark red, and a red origin marker.

use crate::error::{Result, VisualizerError};
use millview_core::{Move, ToolDiameter};
use svg::node::element::{Circle, Line};
use svg::Document;
use tracing::warn;

/// Default image scale
pub const DEFAULT_PIXELS_PER_MM: f32 = 20.0;

const TOOL_FILL: &str = "rgb(0%,0%,0%)";
const DIRECTION_STROKE: &str = "rgb(0%,0%,100%)";
const DIRECTION_WIDTH: f32 = 3.0;
const MAJOR_GRID_STROKE: &str = "rgb(50%,0%,0%)";
const MINOR_GRID_STROKE: &str = "rgb(70%,70%,70%)";
/// Grid lines per axis above which the grid is left out
const MAX_GRID_LINES: i64 = 10_000;

/// SVG rendering options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub pixels_per_mm: f32,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
        }
    }
}

/// Grid line color: every tenth millimeter line is major.
fn grid_stroke(line_id: i64) -> &'static str {
    if line_id.rem_euclid(10) == 0 {
        MAJOR_GRID_STROKE
    } else {
        MINOR_GRID_STROKE
    }
}

fn line(from: (f32, f32), to: (f32, f32)) -> Line {
    Line::new()
        .set("x1", from.0)
        .set("y1", from.1)
        .set("x2", to.0)
        .set("y2", to.1)
}

/// Render `moves` as an SVG document.
pub fn moves_to_svg(moves: &[Move], tool_diameter: ToolDiameter, options: SvgOptions) -> Result<String> {
    let ppm = options.pixels_per_mm;
    if !(ppm.is_finite() && ppm > 0.0) {
        return Err(VisualizerError::InvalidScale(ppm));
    }

    let mut points: Vec<(f32, f32)> = Vec::with_capacity(moves.len());
    for (index, mv) in moves.iter().enumerate() {
        let point = (mv.x * ppm, mv.y * ppm);
        if point.0.is_finite() && point.1.is_finite() {
            points.push(point);
        } else {
            warn!(index, ?mv, "skipping move with non-finite coordinates in SVG export");
        }
    }
    if points.is_empty() {
        return Err(VisualizerError::EmptyMoveList);
    }

    let tool_width = tool_diameter.mm() * ppm;
    let margin = 2.0 * tool_width;

    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
        |(min_x, max_x, min_y, max_y), &(x, y)| {
            (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
        },
    );

    let mut document = Document::new().set(
        "viewBox",
        format!(
            "{} {} {} {}",
            min_x - margin,
            min_y - margin,
            (max_x - min_x) + 2.0 * margin,
            (max_y - min_y) + 2.0 * margin
        ),
    );

    for &(x, y) in &points {
        document = document.add(
            Circle::new()
                .set("cx", x)
                .set("cy", y)
                .set("r", tool_width / 2.0)
                .set("fill", TOOL_FILL),
        );
    }

    for pair in points.windows(2) {
        document = document
            .add(
                line(pair[0], pair[1])
                    .set("stroke", TOOL_FILL)
                    .set("stroke-width", tool_width),
            )
            .add(
                line(pair[0], pair[1])
                    .set("stroke", DIRECTION_STROKE)
                    .set("stroke-width", DIRECTION_WIDTH),
            );
    }

    let x_lines = grid_range(min_x / ppm, max_x / ppm);
    let y_lines = grid_range(min_y / ppm, max_y / ppm);
    match (x_lines, y_lines) {
        (Some((first_x, last_x)), Some((first_y, last_y))) => {
            for line_id in first_x..=last_x {
                let x = line_id as f32 * ppm;
                document =
                    document.add(line((x, min_y), (x, max_y)).set("stroke", grid_stroke(line_id)));
            }
            for line_id in first_y..=last_y {
                let y = line_id as f32 * ppm;
                document =
                    document.add(line((min_x, y), (max_x, y)).set("stroke", grid_stroke(line_id)));
            }
        }
        _ => warn!(
            width_mm = (max_x - min_x) / ppm,
            height_mm = (max_y - min_y) / ppm,
            "path too large for a 1 mm grid, leaving it out"
        ),
    }

    document = document.add(
        Circle::new()
            .set("cx", 0)
            .set("cy", 0)
            .set("r", 0.5 * ppm)
            .set("fill", "red"),
    );

    Ok(document.to_string())
}

/// Millimeter line ids covering `min..=max`, or `None` past [`MAX_GRID_LINES`].
fn grid_range(min: f32, max: f32) -> Option<(i64, i64)> {
    let first = min.floor();
    let last = max.ceil();
    if !(first.is_finite() && last.is_finite())
        || f64::from(last) - f64::from(first) >= MAX_GRID_LINES as f64
    {
        return None;
    }
    Some((first as i64, last as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_stroke() {
        assert_eq!(grid_stroke(0), MAJOR_GRID_STROKE);
        assert_eq!(grid_stroke(-10), MAJOR_GRID_STROKE);
        assert_eq!(grid_stroke(20), MAJOR_GRID_STROKE);
        assert_eq!(grid_stroke(-3), MINOR_GRID_STROKE);
        assert_eq!(grid_stroke(7), MINOR_GRID_STROKE);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(
            moves_to_svg(&[], ToolDiameter::unchecked(1.0), SvgOptions::default()),
            Err(VisualizerError::EmptyMoveList)
        ));
    }

    #[test]
    fn test_single_point() {
        let svg = moves_to_svg(
            &[Move::milling(0.0, 0.0, -1.0)],
            ToolDiameter::unchecked(1.0),
            SvgOptions::default(),
        )
        .unwrap();
        // One turning point plus the origin marker
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("viewBox=\"-40 -40 80 80\""));
    }

    #[test]
    fn test_non_finite_moves_skipped() {
        let moves = [
            Move::milling(0.0, 0.0, 0.0),
            Move::milling(f32::INFINITY, 0.0, 0.0),
            Move::milling(1.0, 0.0, 0.0),
        ];
        let svg = moves_to_svg(&moves, ToolDiameter::unchecked(1.0), SvgOptions::default()).unwrap();
        // Two finite points plus the origin marker
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("stroke-width=\"3\"").count(), 1);

        let only_nan = [Move::rapid(f32::NAN, 0.0, 0.0)];
        assert!(matches!(
            moves_to_svg(&only_nan, ToolDiameter::unchecked(1.0), SvgOptions::default()),
            Err(VisualizerError::EmptyMoveList)
        ));
    }

    #[test]
    fn test_huge_extent_leaves_out_grid() {
        let moves = [Move::milling(0.0, 0.0, 0.0), Move::milling(3.0e38, 0.0, 0.0)];
        let svg = moves_to_svg(&moves, ToolDiameter::unchecked(1.0), SvgOptions { pixels_per_mm: 1.0 })
            .unwrap();
        assert!(!svg.contains(MAJOR_GRID_STROKE));
        assert!(!svg.contains(MINOR_GRID_STROKE));
        assert_eq!(grid_range(-2.5, 3.5), Some((-3, 4)));
        assert_eq!(grid_range(0.0, 1.0e9), None);
    }

    #[test]
    fn test_invalid_scale() {
        let moves = [Move::milling(0.0, 0.0, 0.0)];
        for ppm in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                moves_to_svg(&moves, ToolDiameter::unchecked(1.0), SvgOptions { pixels_per_mm: ppm }),
                Err(VisualizerError::InvalidScale(_))
            ));
        }
    }
}
