//! Raw styling fields as submitted by the layer editor.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::breakpoint::{BreakpointSet, defaults};

pub const DEFAULT_ICON_IMAGE: &str = "default-icon";
pub const DEFAULT_TEXT_FIELD: &str = "{name}";
pub const DEFAULT_TEXT_FONT: &str = "Asap Medium";

/// Flat set of styling fields covering every compiled visual type.
///
/// Missing fields take the editor's defaults. Only the fields of the layer's
/// own visual type are read when compiling; see [`StyleForm::narrow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleForm {
    // fill
    pub fill_color: String,
    pub fill_opacity: f64,
    pub fill_outline_color: String,
    pub use_fill_zoom_styling: bool,

    // symbol
    pub text_color: String,
    pub text_halo_color: String,
    pub text_halo_width: f64,
    pub text_size_default: f64,
    /// Editor toggle only; text size interpolates whenever its set has stops.
    pub use_text_size_zoom_styling: bool,
    pub text_field: String,
    pub icon_image: String,
    /// Overrides `icon_image` when non-blank.
    pub custom_icon_image: String,
    pub icon_size_default: f64,
    pub use_icon_size_zoom_styling: bool,

    // circle
    pub circle_color: String,
    pub circle_opacity: f64,
    pub circle_radius: f64,
    pub circle_stroke_color: String,
    pub circle_stroke_width: f64,

    // line
    pub line_color: String,
    pub line_width: f64,
    pub line_blur: f64,
    pub line_opacity: f64,

    // breakpoint lists
    pub zoom_levels: BreakpointSet,
    pub text_zoom_levels: BreakpointSet,
    pub circle_radius_zoom_levels: BreakpointSet,
    pub line_width_zoom_levels: BreakpointSet,

    /// Raw paint map for types without a dedicated compiler.
    #[serde(deserialize_with = "property_map")]
    pub paint: Map<String, Value>,
    /// Raw layout map for types without a dedicated compiler.
    #[serde(deserialize_with = "property_map")]
    pub layout: Map<String, Value>,
}

impl Default for StyleForm {
    fn default() -> Self {
        Self {
            fill_color: "#e3ed58".to_string(),
            fill_opacity: 0.5,
            fill_outline_color: "#FF0000".to_string(),
            use_fill_zoom_styling: false,

            text_color: "#000080".to_string(),
            text_halo_color: "#ffffff".to_string(),
            text_halo_width: 2.0,
            text_size_default: 12.0,
            use_text_size_zoom_styling: false,
            text_field: DEFAULT_TEXT_FIELD.to_string(),
            icon_image: DEFAULT_ICON_IMAGE.to_string(),
            custom_icon_image: String::new(),
            icon_size_default: 0.5,
            use_icon_size_zoom_styling: false,

            circle_color: "#097911".to_string(),
            circle_opacity: 1.0,
            circle_radius: 5.0,
            circle_stroke_color: "#0000ee".to_string(),
            circle_stroke_width: 2.0,

            line_color: "#ff9900".to_string(),
            line_width: 5.0,
            line_blur: 0.0,
            line_opacity: 1.0,

            zoom_levels: defaults::zoom_levels(),
            text_zoom_levels: defaults::text_zoom_levels(),
            circle_radius_zoom_levels: defaults::circle_radius_zoom_levels(),
            line_width_zoom_levels: defaults::line_width_zoom_levels(),

            paint: Map::new(),
            layout: Map::new(),
        }
    }
}

/// Accepts a property map as a JSON object, as a serialized JSON string, or
/// as null/empty.
fn property_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        Value::String(raw) if raw.trim().is_empty() => Ok(Map::new()),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(de::Error::custom("property map string must hold a JSON object")),
            Err(e) => Err(de::Error::custom(format!("invalid property map: {e}"))),
        },
        other => Err(de::Error::custom(format!(
            "expected a property map, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_editor_defaults() {
        let form: StyleForm =
            serde_json::from_str(r##"{"fillColor":"#123456"}"##).expect("deserialize");
        assert_eq!(form.fill_color, "#123456");
        assert_eq!(form.fill_opacity, 0.5);
        assert_eq!(form.text_field, "{name}");
        assert_eq!(form.zoom_levels.len(), 4);
    }

    #[test]
    fn property_maps_accept_serialized_strings() {
        let form: StyleForm = serde_json::from_str(
            r#"{"paint":"{\"raster-opacity\":0.4}","layout":{"visibility":"none"}}"#,
        )
        .expect("deserialize");
        assert_eq!(form.paint["raster-opacity"], 0.4);
        assert_eq!(form.layout["visibility"], "none");

        let empty: StyleForm = serde_json::from_str(r#"{"paint":"","layout":null}"#)
            .expect("deserialize empty maps");
        assert!(empty.paint.is_empty());
        assert!(empty.layout.is_empty());
    }

    #[test]
    fn property_map_rejects_non_object() {
        let result = serde_json::from_str::<StyleForm>(r#"{"paint":"[1,2]"}"#);
        assert!(result.is_err());
    }
}
