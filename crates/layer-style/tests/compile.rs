//! Integration tests for style compilation.

use layer_model::VisualType;
use layer_style::{
    Breakpoint, BreakpointSet, StyleForm, compile_form, resolve_source, to_interpolation,
};
use proptest::prelude::*;

fn compile_default(visual_type: VisualType, form: &StyleForm) -> (String, String) {
    let compiled = compile_form(visual_type, form).expect("compile");
    (compiled.paint_json(), compiled.layout_json())
}

#[test]
fn fill_by_zoom_snapshot() {
    let form = StyleForm {
        use_fill_zoom_styling: true,
        ..StyleForm::default()
    };
    let (paint, layout) = compile_default(VisualType::Fill, &form);
    insta::assert_snapshot!(paint, @r##"{"fill-color":"#e3ed58","fill-opacity":["interpolate",["linear"],["zoom"],6.0,0.0,8.0,0.3,12.0,0.8,15.0,1.0],"fill-outline-color":"#FF0000"}"##);
    assert_eq!(layout, "{}");
}

#[test]
fn symbol_defaults_snapshot() {
    let (paint, layout) = compile_default(VisualType::Symbol, &StyleForm::default());
    insta::assert_snapshot!(paint, @r##"{"text-color":"#000080","text-halo-color":"#ffffff","text-halo-width":2.0}"##);
    insta::assert_snapshot!(layout, @r#"{"icon-image":"default-icon","icon-size":0.5,"text-field":"{name}","text-font":["Asap Medium"],"text-size":["interpolate",["linear"],["zoom"],8.0,7.0,15.0,17.0,20.0,25.0],"visibility":"visible"}"#);
}

#[test]
fn circle_defaults_snapshot() {
    let (paint, _) = compile_default(VisualType::Circle, &StyleForm::default());
    insta::assert_snapshot!(paint, @r##"{"circle-color":"#097911","circle-opacity":["interpolate",["linear"],["zoom"],6.0,0.0,8.0,0.3,12.0,0.8,15.0,1.0],"circle-radius":["interpolate",["linear"],["zoom"],6.0,0.0,10.0,3.0,14.0,7.0,18.0,12.0],"circle-stroke-color":"#0000ee","circle-stroke-width":2.0}"##);
}

#[test]
fn line_defaults_snapshot() {
    let (paint, layout) = compile_default(VisualType::Line, &StyleForm::default());
    insta::assert_snapshot!(paint, @r##"{"line-blur":0.0,"line-color":"#ff9900","line-opacity":1.0,"line-width":["interpolate",["linear"],["zoom"],6.0,0.0,8.0,0.5,12.0,1.5,15.0,2.5]}"##);
    assert_eq!(layout, "{}");
}

#[test]
fn circle_with_empty_radius_set_falls_back_to_scalar() {
    let form = StyleForm {
        circle_radius_zoom_levels: BreakpointSet::default(),
        circle_radius: 9.0,
        ..StyleForm::default()
    };
    let compiled = compile_form(VisualType::Circle, &form).expect("compile");
    assert_eq!(compiled.paint["circle-radius"], 9.0);
    assert!(compiled.paint["circle-opacity"].is_array());
}

#[test]
fn form_from_editor_json_compiles() {
    let form: StyleForm = serde_json::from_value(serde_json::json!({
        "lineColor": "#112233",
        "lineWidthZoomLevels": [
            { "zoom": 15, "value": 1 },
            { "zoom": 6, "value": 0 },
            { "zoom": 12, "value": 0.8 }
        ]
    }))
    .expect("deserialize form");
    let compiled = compile_form(VisualType::Line, &form).expect("compile");
    assert_eq!(
        compiled.paint["line-width"].to_string(),
        r#"["interpolate",["linear"],["zoom"],6.0,0.0,12.0,0.8,15.0,1.0]"#
    );
    assert_eq!(compiled.paint["line-color"], "#112233");
}

#[test]
fn source_resolution_is_independent_of_visual_type() {
    let a = resolve_source("geojson", "https://example.com/a.geojson");
    let b = resolve_source("geojson", "https://example.com/a.geojson");
    assert_eq!(a, b);
    assert_eq!(a.kind(), "geojson");
}

fn breakpoints() -> impl Strategy<Value = Vec<Breakpoint>> {
    prop::collection::vec(
        (0.0f64..=22.0, -100.0f64..100.0).prop_map(|(zoom, value)| Breakpoint::new(zoom, value)),
        1..12,
    )
}

proptest! {
    #[test]
    fn interpolation_stops_are_non_decreasing(points in breakpoints()) {
        let expr = to_interpolation(&points).expect("non-empty");
        let stops = expr.stops();
        prop_assert_eq!(stops.len(), points.len());
        for pair in stops.windows(2) {
            prop_assert!(pair[0].zoom <= pair[1].zoom);
        }
    }

    #[test]
    fn compilation_is_deterministic(points in breakpoints(), enabled in any::<bool>()) {
        let form = StyleForm {
            use_fill_zoom_styling: enabled,
            use_icon_size_zoom_styling: enabled,
            zoom_levels: BreakpointSet::new(points),
            ..StyleForm::default()
        };
        for visual_type in VisualType::ALL {
            let first = compile_default(visual_type, &form);
            let second = compile_default(visual_type, &form);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn fill_without_zoom_styling_is_always_scalar(points in breakpoints(), opacity in 0.0f64..=1.0) {
        let form = StyleForm {
            use_fill_zoom_styling: false,
            fill_opacity: opacity,
            zoom_levels: BreakpointSet::new(points),
            ..StyleForm::default()
        };
        let compiled = compile_form(VisualType::Fill, &form).expect("compile");
        prop_assert_eq!(compiled.paint["fill-opacity"].as_f64(), Some(opacity));
    }
}
