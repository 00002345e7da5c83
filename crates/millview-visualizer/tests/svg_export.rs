mod common;

use common::{scenario_moves, square_pocket};
use millview_core::ToolDiameter;
use millview_visualizer::{moves_to_svg, SvgOptions};

#[test]
fn test_element_counts() {
    let moves = square_pocket();
    let svg = moves_to_svg(&moves, ToolDiameter::unchecked(1.0), SvgOptions::default()).unwrap();

    // One disc per turning point plus the origin marker
    assert_eq!(svg.matches("<circle").count(), moves.len() + 1);
    assert_eq!(svg.matches("stroke-width=\"3\"").count(), moves.len() - 1);
    assert_eq!(svg.matches("stroke-width=\"20\"").count(), moves.len() - 1);
}

#[test]
fn test_view_box_and_grid() {
    let options = SvgOptions { pixels_per_mm: 10.0 };
    let svg = moves_to_svg(&scenario_moves(), ToolDiameter::unchecked(1.0), options).unwrap();

    // X spans 0..100 px, Y stays at 0, margin is twice the tool width
    assert!(svg.contains("viewBox=\"-20 -20 140 40\""));
    // Major lines at x = 0 mm and x = 10 mm and at y = 0 mm
    assert_eq!(svg.matches("rgb(50%,0%,0%)").count(), 3);
    // Minor lines at x = 1..9 mm
    assert_eq!(svg.matches("rgb(70%,70%,70%)").count(), 9);
}

#[test]
fn test_z_is_ignored() {
    let flat = moves_to_svg(
        &[millview_core::Move::milling(1.0, 2.0, 0.0), millview_core::Move::milling(3.0, 4.0, 0.0)],
        ToolDiameter::unchecked(2.0),
        SvgOptions::default(),
    )
    .unwrap();
    let deep = moves_to_svg(
        &[millview_core::Move::milling(1.0, 2.0, -5.0), millview_core::Move::rapid(3.0, 4.0, 9.0)],
        ToolDiameter::unchecked(2.0),
        SvgOptions::default(),
    )
    .unwrap();
    assert_eq!(flat, deep);
}
