use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("svg").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("archsketch-cli"))
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn titles(diagram: &Value) -> Vec<String> {
    diagram["components"]
        .as_array()
        .expect("components array")
        .iter()
        .map(|c| c["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn cli_imports_svg_file_to_json() {
    let output = cli()
        .arg(fixture("cms_pipeline.svg"))
        .assert()
        .success()
        .get_output()
        .clone();

    let diagram = stdout_json(&output);
    assert_eq!(diagram["title"], "Content Platform");
    assert_eq!(diagram["components"].as_array().unwrap().len(), 8);
    assert_eq!(diagram["connections"].as_array().unwrap().len(), 4);
    assert_eq!(diagram["description"], "Imported from SVG");
}

#[test]
fn cli_reads_stdin_and_writes_out_file() {
    let svg = fs::read_to_string(fixture("nested_layers.svg")).expect("read fixture");
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("diagram.json");

    cli()
        .args(["import", "--pretty", "--out", out.to_string_lossy().as_ref(), "-"])
        .write_stdin(svg)
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("read out");
    assert!(text.contains("\n  \"title\": \"Checkout Flow\""));
    let diagram: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(titles(&diagram).last().map(String::as_str), Some("Checkout Flow"));
}

#[test]
fn cli_layer_policy_flag_and_config_file() {
    let output = cli()
        .args(["--layer-policy", "smallest"])
        .arg(fixture("nested_layers.svg"))
        .assert()
        .success()
        .get_output()
        .clone();
    let diagram = stdout_json(&output);
    assert_eq!(titles(&diagram).last().map(String::as_str), Some("SERVICE LAYER"));

    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("import.json5");
    fs::write(
        &config,
        "// full-size import\n{ scale: 1, layerPolicy: 'smallestArea', }\n",
    )
    .expect("write config");

    let output = cli()
        .args(["--config", config.to_string_lossy().as_ref()])
        .arg(fixture("nested_layers.svg"))
        .assert()
        .success()
        .get_output()
        .clone();
    let diagram = stdout_json(&output);
    let container = diagram["components"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(container["title"], "SERVICE LAYER");
    assert_eq!(container["position"]["x"], 100.0);

    // Flags win over the config file.
    let output = cli()
        .args(["--config", config.to_string_lossy().as_ref()])
        .args(["--layer-policy", "first"])
        .arg(fixture("nested_layers.svg"))
        .assert()
        .success()
        .get_output()
        .clone();
    let diagram = stdout_json(&output);
    assert_eq!(titles(&diagram).last().map(String::as_str), Some("Checkout Flow"));
}

#[test]
fn cli_merges_into_existing_diagram() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let base = tmp.path().join("base.json");

    cli()
        .args(["--out", base.to_string_lossy().as_ref()])
        .arg(fixture("nested_layers.svg"))
        .assert()
        .success();

    let output = cli()
        .args(["--merge-into", base.to_string_lossy().as_ref()])
        .arg(fixture("cms_pipeline.svg"))
        .assert()
        .success()
        .get_output()
        .clone();
    let diagram = stdout_json(&output);
    assert_eq!(diagram["title"], "Checkout Flow");
    assert_eq!(diagram["components"].as_array().unwrap().len(), 3 + 8);
    assert_eq!(diagram["connections"].as_array().unwrap().len(), 1 + 4);
}

#[test]
fn cli_prints_primitives() {
    let output = cli()
        .args(["primitives", "--pretty"])
        .arg(fixture("nested_layers.svg"))
        .assert()
        .success()
        .get_output()
        .clone();
    let prims = stdout_json(&output);
    assert_eq!(prims["rects"].as_array().unwrap().len(), 4);
    assert_eq!(prims["paths"].as_array().unwrap().len(), 1);
    assert_eq!(prims["paths"][0]["dashPattern"], "5,5");
}

#[test]
fn cli_normalize_drops_dangling_connections() {
    let diagram = serde_json::json!({
        "id": "d",
        "title": "Sketch",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
        "components": [{
            "id": "a",
            "type": "service",
            "position": { "x": 0.0, "y": 0.0 },
            "size": { "width": 120.0, "height": 80.0 },
            "title": "A",
            "connections": ["b"]
        }],
        "connections": [{ "id": "c", "sourceId": "a", "targetId": "b" }]
    });

    let output = cli()
        .arg("normalize")
        .write_stdin(diagram.to_string())
        .assert()
        .success()
        .get_output()
        .clone();
    let normalized = stdout_json(&output);
    assert_eq!(normalized["id"], "d");
    assert_eq!(normalized["connections"], serde_json::json!([]));
    assert_eq!(normalized["components"][0]["connections"], serde_json::json!([]));
}

#[test]
fn cli_reports_usage_and_input_errors() {
    cli().arg("--bogus").assert().code(2);
    cli().args(["--layer-policy", "sideways"]).assert().code(2);
    cli().arg("--out").assert().code(2);

    cli().write_stdin("<svg><g></svg>").assert().code(1);
    cli()
        .arg(repo_root().join("fixtures").join("does-not-exist.svg"))
        .assert()
        .code(1);

    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("bad.json5");
    fs::write(&config, "{ scale: 'big' }").expect("write config");
    cli()
        .args(["--config", config.to_string_lossy().as_ref()])
        .arg(fixture("nested_layers.svg"))
        .assert()
        .code(1);
}
