use millview::commands;
use millview::{Config, StylePreset};
use std::fs;
use tempfile::TempDir;

const SCENARIO: &str = "[[0,0,0,false],[10,0,0,false],[10,0,5,true]]";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_stats_for_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "moves.json", SCENARIO);

    let config = Config::default();
    let moves = commands::load_moves(&path).unwrap();
    let diameter = commands::resolve_tool_diameter(Some(2.0), &config).unwrap();
    let stats = commands::scene_stats(&moves, diameter, &config);

    assert_eq!(stats.move_count, 3);
    assert_eq!(stats.segments, 2);
    assert_eq!(stats.rapid_segments, 1);
    assert_eq!(stats.milling_segments, 1);

    let report = commands::stats_report(&stats).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["segments"], 2);
}

#[test]
fn test_envelope_with_origin_entry() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "sim.json", r#"{"moves": [[0,0,0],[5,0,0,false],[5,5,0,true]]}"#);
    let moves = commands::load_moves(&path).unwrap();
    assert_eq!(moves.len(), 3);
    assert!(!moves[0].is_rapid);
}

#[test]
fn test_svg_written() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "moves.json", SCENARIO);
    let output = dir.path().join("out.svg");

    let moves = commands::load_moves(&input).unwrap();
    let diameter = commands::resolve_tool_diameter(None, &Config::default()).unwrap();
    commands::write_svg(&moves, diameter, 20.0, &output).unwrap();

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("<svg"));
    assert_eq!(svg.matches("<circle").count(), 4);
}

#[test]
fn test_svg_of_empty_list_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "empty.json", "[]");
    let moves = commands::load_moves(&input).unwrap();
    let diameter = commands::resolve_tool_diameter(Some(1.0), &Config::default()).unwrap();
    assert!(commands::write_svg(&moves, diameter, 20.0, &dir.path().join("e.svg")).is_err());
}

#[test]
fn test_invalid_inputs() {
    let dir = TempDir::new().unwrap();
    let bad = write(&dir, "bad.json", r#"[[0,0,0,false],["x",0,0,true]]"#);
    let err = commands::load_moves(&bad).unwrap_err();
    assert!(format!("{:#}", err).contains("index 1"));

    assert!(commands::load_moves(&dir.path().join("missing.json")).is_err());
    assert!(commands::resolve_tool_diameter(Some(0.0), &Config::default()).is_err());
    assert!(commands::resolve_tool_diameter(Some(-2.0), &Config::default()).is_err());
}

#[test]
fn test_config_file_drives_assembly() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "config.toml",
        "[scene]\nrender_unit = 2.0\npreset = \"legacy\"\ndefault_tool_diameter = 4.0\n",
    );

    let config = commands::load_config(Some(&path)).unwrap();
    assert_eq!(config.scene.preset, StylePreset::Legacy);
    let diameter = commands::resolve_tool_diameter(None, &config).unwrap();
    assert_eq!(diameter.mm(), 4.0);

    let assembler = commands::assembler_for(&config, Some(StylePreset::Milling));
    assert_eq!(assembler.transform().scale().get(), 2.0);
    assert!(commands::load_config(Some(&dir.path().join("nope.toml"))).is_err());
}
