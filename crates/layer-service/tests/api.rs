//! End-to-end tests through `LayerService::handle`.

use std::sync::Arc;

use chrono::Duration;
use layer_auth::{AuthGuard, InMemoryRevocationStore, TokenKey};
use layer_service::{LayerService, Method, Request, Response};
use layer_store::HierarchyStore;
use serde_json::{Value, json};

const SECRET: &str = "api-test-secret";

fn service() -> LayerService {
    let key = TokenKey::new(SECRET).expect("key");
    let guard = AuthGuard::new(key, Arc::new(InMemoryRevocationStore::default()));
    LayerService::new(Arc::new(HierarchyStore::new()), guard)
}

fn bearer(subject: &str) -> String {
    let token = TokenKey::new(SECRET)
        .expect("key")
        .issue(subject, Duration::hours(1))
        .expect("issue");
    format!("Bearer {token}")
}

fn send(service: &LayerService, request: Request) -> Response {
    service.handle(&request.with_authorization(bearer("editor")))
}

fn id_of(response: &Response, key: &str) -> String {
    response.body[key]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("no {key}.id in {}", response.body))
        .to_string()
}

/// Section with one group, returning (section id, group id).
fn seed(service: &LayerService) -> (String, String) {
    let section = send(service, Request::post("/LayerSection", json!({ "name": "Planning" })));
    assert_eq!(section.status, 201);
    let section_id = id_of(&section, "layerSection");

    let group = send(
        service,
        Request::post(
            "/api/LayerGroup",
            json!({
                "name": "Zoning",
                "layerSectionId": section_id,
                "longitude": -80.13,
                "latitude": 26.12,
                "zoom": 11,
                "bearing": 0
            }),
        ),
    );
    assert_eq!(group.status, 201, "{}", group.body);
    (section_id, id_of(&group, "layerGroup"))
}

fn create_layer(service: &LayerService, group: &str, name: &str) -> Value {
    let response = send(
        service,
        Request::post(
            "/LayerData",
            json!({
                "layerGroupId": group,
                "name": name,
                "type": "circle",
                "sourceType": "vector",
                "sourceUrl": "mapbox://parcels",
                "circleColor": "#123456",
                "hover": true,
                "hoverContent": [{ "label": "Owner", "type": "NAME" }]
            }),
        ),
    );
    assert_eq!(response.status, 201, "{}", response.body);
    response.body["layerData"].clone()
}

#[test]
fn created_layer_is_compiled_and_ordered() {
    let service = service();
    let (_, group) = seed(&service);

    let first = create_layer(&service, &group, "Parcels");
    let second = create_layer(&service, &group, "Lots");

    assert_eq!(first["order"], 0);
    assert_eq!(second["order"], 1);
    assert_eq!(first["source"], json!({ "type": "vector", "url": "mapbox://parcels" }));
    let paint: Value = serde_json::from_str(first["paint"].as_str().expect("paint")).expect("json");
    assert_eq!(paint["circle-color"], "#123456");
    assert!(paint["circle-radius"].is_array());
    assert_eq!(first["hoverContent"][0]["type"], "NAME");
}

#[test]
fn reads_are_public_and_nested() {
    let service = service();
    let (section, group) = seed(&service);
    create_layer(&service, &group, "Parcels");

    let listed = service.handle(&Request::get("/LayerSection"));
    assert_eq!(listed.status, 200);
    let tree = &listed.body["layerSections"][0];
    assert_eq!(tree["name"], "Planning");
    assert_eq!(tree["layerGroups"][0]["layers"][0]["name"], "Parcels");

    let one = service.handle(&Request::get(format!("/LayerSection/{section}")));
    assert_eq!(one.body["layerSection"]["layerGroups"][0]["name"], "Zoning");
}

#[test]
fn missing_records_read_as_null() {
    let service = service();
    let id = "0b7e2c1a-9d3f-4e5a-8b6c-7d8e9f0a1b2c";
    for (path, key) in [
        (format!("/LayerSection/{id}"), "layerSection"),
        (format!("/LayerGroup/{id}"), "layerGroup"),
        (format!("/LayerData/{id}"), "layerData"),
    ] {
        let response = service.handle(&Request::get(path));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ key: null }));
    }
}

#[test]
fn mutations_require_a_token() {
    let service = service();
    let response = service.handle(&Request::post("/LayerSection", json!({ "name": "x" })));
    assert_eq!(response.status, 401);
    assert!(response.body["error"].is_string());

    let listed = service.handle(&Request::get("/LayerSection"));
    assert_eq!(listed.body["layerSections"], json!([]));
}

#[test]
fn logout_revokes_the_callers_token() {
    let service = service();
    let header = bearer("user-42");

    let logout = service
        .handle(&Request::new(Method::Post, "/auth/logout").with_authorization(header.clone()));
    assert_eq!(logout.status, 200);

    let after = service.handle(
        &Request::post("/LayerSection", json!({ "name": "Late" })).with_authorization(header),
    );
    assert_eq!(after.status, 401);

    // Other users keep working.
    let other = send(&service, Request::post("/LayerSection", json!({ "name": "Ok" })));
    assert_eq!(other.status, 201);
}

#[test]
fn rearrange_swaps_and_reports_edges() {
    let service = service();
    let (_, group) = seed(&service);
    let a = create_layer(&service, &group, "A");
    let b = create_layer(&service, &group, "B");
    let b_id = b["id"].as_str().expect("id");

    let up = send(&service, Request::put(format!("/LayerData/Rearrange/Up/{b_id}"), Value::Null));
    assert_eq!(up.status, 200);
    assert_eq!(up.body["moved"], true);
    assert_eq!(up.body["order"], 0);

    let again = send(&service, Request::put(format!("/LayerData/Rearrange/Up/{b_id}"), Value::Null));
    assert_eq!(again.body["moved"], false);

    let a_id = a["id"].as_str().expect("id");
    let a_now = service.handle(&Request::get(format!("/LayerData/{a_id}")));
    assert_eq!(a_now.body["layerData"]["order"], 1);
}

#[test]
fn stale_rearrange_revision_conflicts() {
    let service = service();
    let (_, group) = seed(&service);
    create_layer(&service, &group, "A");
    let b = create_layer(&service, &group, "B");
    let b_id = b["id"].as_str().expect("id");

    let response = send(
        &service,
        Request::put(format!("/LayerData/Rearrange/Up/{b_id}"), json!({ "revision": 0 })),
    );
    assert_eq!(response.status, 409);
}

#[test]
fn replace_is_a_full_overwrite() {
    let service = service();
    let (_, group) = seed(&service);
    let layer = create_layer(&service, &group, "Parcels");
    let id = layer["id"].as_str().expect("id");

    let replaced = send(
        &service,
        Request::put(
            format!("/LayerData/{id}"),
            json!({ "name": "Parcels v2", "type": "line", "sourceType": "geojson", "sourceUrl": "/p.json" }),
        ),
    );
    assert_eq!(replaced.status, 200, "{}", replaced.body);
    let record = &replaced.body["layer"];
    assert_eq!(record["name"], "Parcels v2");
    assert_eq!(record["hover"], false);
    assert_eq!(record["hoverContent"], json!([]));
    assert_eq!(record["order"], 0);
    assert_eq!(record["source"], json!({ "type": "geojson", "data": "/p.json" }));
}

#[test]
fn null_optional_fields_are_stored_blank() {
    let service = service();
    let (section, group) = seed(&service);

    let created = send(
        &service,
        Request::post(
            "/LayerGroup",
            json!({ "name": "G", "layerSectionId": section, "infoId": null }),
        ),
    );
    assert_eq!(created.status, 201, "{}", created.body);
    assert_eq!(created.body["layerGroup"]["infoId"], "");

    let layer = send(
        &service,
        Request::post(
            "/LayerData",
            json!({
                "layerGroupId": group,
                "name": "Parcels",
                "type": "fill",
                "sourceType": "vector",
                "sourceUrl": "mapbox://parcels",
                "sourceLayer": null,
                "clickHeader": null,
                "hover": null
            }),
        ),
    );
    assert_eq!(layer.status, 201, "{}", layer.body);
    let record = &layer.body["layerData"];
    assert_eq!(record["sourceLayer"], "");
    assert_eq!(record["clickHeader"], "");
    assert_eq!(record["hover"], false);
}

#[test]
fn deleting_a_section_cascades() {
    let service = service();
    let (section, group) = seed(&service);
    let layer = create_layer(&service, &group, "Parcels");
    create_layer(&service, &group, "Lots");

    let deleted = send(&service, Request::delete(format!("/LayerSection/{section}")));
    assert_eq!(deleted.body, json!({ "message": "deleted" }));

    let id = layer["id"].as_str().expect("id");
    let gone = service.handle(&Request::get(format!("/LayerData/{id}")));
    assert_eq!(gone.body["layerData"], Value::Null);
    let stats = service.store().stats().expect("stats");
    assert_eq!((stats.groups, stats.layers), (0, 0));
}

#[test]
fn validation_and_lookup_errors_map_to_statuses() {
    let service = service();
    let (_, group) = seed(&service);

    let blank = send(&service, Request::post("/LayerSection", json!({ "name": "  " })));
    assert_eq!(blank.status, 400);

    let no_type = send(
        &service,
        Request::post("/LayerData", json!({ "layerGroupId": group, "name": "x" })),
    );
    assert_eq!(no_type.status, 400);

    let bad_breakpoint = send(
        &service,
        Request::post(
            "/LayerData",
            json!({
                "layerGroupId": group,
                "name": "x",
                "type": "line",
                "lineWidthZoomLevels": [{ "zoom": 30, "value": 1 }]
            }),
        ),
    );
    assert_eq!(bad_breakpoint.status, 400);

    let absent = send(
        &service,
        Request::delete("/LayerGroup/0b7e2c1a-9d3f-4e5a-8b6c-7d8e9f0a1b2c"),
    );
    assert_eq!(absent.status, 404);

    let nowhere = service.handle(&Request::get("/Elsewhere"));
    assert_eq!(nowhere.status, 404);
}

#[test]
fn error_body_uses_friendly_message() {
    let service = service();
    let response =
        service.handle(&Request::delete("/LayerSection/0b7e2c1a-9d3f-4e5a-8b6c-7d8e9f0a1b2c"));
    insta::assert_snapshot!(response.body.to_string(), @r#"{"error":"Sign in to make changes."}"#);
}
