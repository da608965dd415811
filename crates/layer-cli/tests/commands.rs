//! Subcommand tests against temporary files.

use std::fs;
use std::path::Path;

use layer_cli::commands::{
    RequestSpec, load_config, run_compile, run_request, run_token_issue, run_token_verify,
    run_tree,
};
use layer_cli::tree::render_tree;
use layer_service::ServiceConfig;
use serde_json::{Value, json};
use tempfile::TempDir;

fn config_with_secret() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.auth.secret = Some("cli-test-secret".to_string());
    config
}

fn write_json(dir: &Path, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, value.to_string()).expect("write json");
    path
}

fn request(
    config: &ServiceConfig,
    snapshot: &Path,
    method: &str,
    path: &str,
    body: Option<std::path::PathBuf>,
    token: &str,
) -> layer_service::Response {
    let spec = RequestSpec {
        method: method.to_string(),
        path: path.to_string(),
        body,
        token: Some(token.to_string()),
        snapshot: snapshot.to_path_buf(),
    };
    run_request(config, &spec).expect("request")
}

#[test]
fn compile_prints_paint_layout_and_source() {
    let dir = TempDir::new().expect("temp dir");
    let form = write_json(
        dir.path(),
        "line.json",
        &json!({
            "name": "Roads",
            "type": "line",
            "sourceType": "geojson",
            "sourceUrl": "/roads.json",
            "lineColor": "#ff0000",
            "lineWidthZoomLevels": [
                { "zoom": 10, "value": 1 },
                { "zoom": 16, "value": 6 }
            ]
        }),
    );

    let compiled = run_compile(&form).expect("compile");
    assert_eq!(compiled["type"], "line");
    assert_eq!(compiled["paint"]["line-color"], "#ff0000");
    let width = compiled["paint"]["line-width"].as_array().expect("expression");
    assert_eq!(width[0], "interpolate");
    assert_eq!(width.len(), 7);
    assert_eq!(compiled["layout"], json!({}));
    assert_eq!(compiled["source"], json!({ "type": "geojson", "data": "/roads.json" }));
}

#[test]
fn compile_rejects_out_of_range_zoom() {
    let dir = TempDir::new().expect("temp dir");
    let form = write_json(
        dir.path(),
        "bad.json",
        &json!({
            "name": "Dots",
            "type": "circle",
            "circleRadiusZoomLevels": [{ "zoom": 40, "value": 2 }]
        }),
    );
    let error = run_compile(&form).expect_err("zoom 40 is out of range");
    assert!(format!("{error:#}").contains("compiling circle layer"), "{error:#}");
}

#[test]
fn issued_tokens_verify() {
    let config = config_with_secret();
    let token = run_token_issue(&config, "user-7", Some(600)).expect("issue");
    let claims = run_token_verify(&config, &token).expect("verify");
    assert_eq!(claims.user_id, "user-7");
    assert_eq!(claims.exp - claims.iat, 600);

    let tampered = format!("{token}x");
    assert!(run_token_verify(&config, &tampered).is_err());
}

#[test]
fn token_commands_need_a_secret() {
    let config = ServiceConfig::default();
    assert!(run_token_issue(&config, "user-7", None).is_err());
    assert!(run_token_issue(&config_with_secret(), "  ", None).is_err());
}

#[test]
fn config_file_is_read_from_explicit_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[auth]\ntoken_ttl_secs = 120\n").expect("write config");
    let config = load_config(Some(&path)).expect("config");
    assert_eq!(config.auth.token_ttl_secs, 120);
}

#[test]
fn mutations_persist_between_invocations() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = dir.path().join("state").join("layers.json");
    let config = config_with_secret();
    let token = run_token_issue(&config, "editor", None).expect("issue");

    let section_body = write_json(dir.path(), "section.json", &json!({ "name": "Planning" }));
    let created = request(&config, &snapshot, "POST", "/LayerSection", Some(section_body), &token);
    assert_eq!(created.status, 201, "{}", created.body);
    assert!(snapshot.exists());
    let section_id = created.body["layerSection"]["id"].as_str().expect("id").to_string();

    let group_body = write_json(
        dir.path(),
        "group.json",
        &json!({ "name": "Zoning", "layerSectionId": section_id }),
    );
    let group = request(&config, &snapshot, "POST", "/LayerGroup", Some(group_body), &token);
    assert_eq!(group.status, 201, "{}", group.body);

    let sections = run_tree(&snapshot).expect("tree");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].section.fields.name, "Planning");
    assert_eq!(sections[0].layer_groups[0].group.fields.name, "Zoning");
}

#[test]
fn rejected_requests_leave_the_snapshot_alone() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = dir.path().join("layers.json");
    let config = config_with_secret();

    let body = write_json(dir.path(), "section.json", &json!({ "name": "Planning" }));
    let response = request(&config, &snapshot, "POST", "/LayerSection", Some(body), "bogus");
    assert_eq!(response.status, 401);
    assert!(!snapshot.exists());
}

#[test]
fn tree_of_missing_snapshot_is_empty() {
    let dir = TempDir::new().expect("temp dir");
    let sections = run_tree(&dir.path().join("absent.json")).expect("tree");
    assert!(sections.is_empty());
}

#[test]
fn tree_table_lists_every_layer() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = dir.path().join("layers.json");
    let config = config_with_secret();
    let token = run_token_issue(&config, "editor", None).expect("issue");

    let section = write_json(dir.path(), "s.json", &json!({ "name": "Planning" }));
    let created = request(&config, &snapshot, "POST", "/LayerSection", Some(section), &token);
    let section_id = created.body["layerSection"]["id"].as_str().expect("id").to_string();
    let group = write_json(
        dir.path(),
        "g.json",
        &json!({ "name": "Zoning", "layerSectionId": section_id }),
    );
    let group = request(&config, &snapshot, "POST", "/LayerGroup", Some(group), &token);
    let group_id = group.body["layerGroup"]["id"].as_str().expect("id").to_string();
    for name in ["Parcels", "Lots"] {
        let layer = write_json(
            dir.path(),
            "l.json",
            &json!({
                "layerGroupId": group_id,
                "name": name,
                "type": "fill",
                "sourceType": "vector",
                "sourceUrl": "mapbox://parcels"
            }),
        );
        let response = request(&config, &snapshot, "POST", "/LayerData", Some(layer), &token);
        assert_eq!(response.status, 201, "{}", response.body);
    }

    let table = render_tree(&run_tree(&snapshot).expect("tree"));
    let rendered = table.to_string();
    assert!(rendered.contains("Parcels"));
    assert!(rendered.contains("Lots"));
    assert!(rendered.contains("Zoning"));
    assert_eq!(table.row_iter().count(), 2);
}
