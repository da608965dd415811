//! Layer editor submissions.

use serde::{Deserialize, Serialize};

use layer_model::{
    Camera, DataFields, GroupId, HoverRow, ModelError, VisualType, null_as_default,
};
use layer_style::{StyleForm, compile_form, resolve_source};

use crate::error::Result;

/// Body of `POST /LayerData` and `PUT /LayerData/{id}`.
///
/// Carries the persisted record fields plus the raw styling fields that are
/// compiled into `paint` and `layout`. Omitted fields take empty defaults;
/// nothing is merged with a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerForm {
    /// Parent group. Required on create, ignored on replace.
    #[serde(default, deserialize_with = "null_as_default")]
    pub layer_group_id: Option<GroupId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    pub visual_type: VisualType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon_color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon_type: String,
    #[serde(flatten)]
    pub camera: Camera,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_layer_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_layer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hover: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub click: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hover_style: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_style: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_header: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hover_content: Vec<HoverRow>,
    #[serde(flatten)]
    pub style: StyleForm,
}

impl LayerForm {
    /// Parent group, required when creating.
    pub fn group(&self) -> Result<GroupId> {
        self.layer_group_id.ok_or_else(|| {
            ModelError::MissingField {
                entity: "layer",
                field: "layerGroupId",
            }
            .into()
        })
    }

    /// Compile the styling fields and resolve the source into a full record.
    pub fn into_fields(self) -> Result<DataFields> {
        let compiled = compile_form(self.visual_type, &self.style)?;
        let source = resolve_source(&self.source_type, &self.source_url);
        tracing::debug!(
            visual_type = %self.visual_type,
            source_type = source.kind(),
            "compiled layer form"
        );
        Ok(DataFields {
            name: self.name,
            visual_type: self.visual_type,
            label: self.label,
            icon_color: self.icon_color,
            icon_type: self.icon_type,
            camera: self.camera,
            group_name: self.group_name,
            top_layer_class: self.top_layer_class,
            info_id: self.info_id,
            source_type: self.source_type,
            source_url: self.source_url,
            source_id: self.source_id,
            source_layer: self.source_layer,
            source,
            paint: compiled.paint_json(),
            layout: compiled.layout_json(),
            hover: self.hover,
            click: self.click,
            time: self.time,
            hover_style: self.hover_style,
            click_style: self.click_style,
            click_header: self.click_header,
            hover_content: self.hover_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_model::{HoverFieldKind, SourceDescriptor};

    fn form(json: serde_json::Value) -> LayerForm {
        serde_json::from_value(json).expect("layer form")
    }

    #[test]
    fn geojson_form_compiles_to_inline_source() {
        let fields = form(serde_json::json!({
            "name": "Parks",
            "type": "fill",
            "sourceType": "geojson",
            "sourceUrl": "https://example.com/parks.geojson",
            "fillColor": "#00aa00",
            "hoverContent": [{ "label": "Name", "type": "NAME" }]
        }))
        .into_fields()
        .expect("fields");

        assert_eq!(
            fields.source,
            SourceDescriptor::Inline {
                kind: "geojson".to_string(),
                data: "https://example.com/parks.geojson".to_string(),
            }
        );
        assert!(fields.paint.contains("\"fill-color\":\"#00aa00\""));
        assert_eq!(fields.layout, "{}");
        assert_eq!(fields.hover_content[0].kind, HoverFieldKind::Name);
    }

    #[test]
    fn passthrough_types_keep_raw_maps() {
        let fields = form(serde_json::json!({
            "name": "Terrain",
            "type": "hillshade",
            "sourceType": "raster-dem",
            "paint": "{\"hillshade-exaggeration\":0.5}",
            "layout": { "visibility": "none" }
        }))
        .into_fields()
        .expect("fields");

        assert_eq!(fields.paint, r#"{"hillshade-exaggeration":0.5}"#);
        assert_eq!(fields.layout, r#"{"visibility":"none"}"#);
    }

    #[test]
    fn missing_type_is_rejected() {
        let result: std::result::Result<LayerForm, _> =
            serde_json::from_value(serde_json::json!({ "name": "No type" }));
        assert!(result.is_err());
    }

    #[test]
    fn group_is_required_for_create() {
        let form = form(serde_json::json!({ "name": "x", "type": "line" }));
        assert!(form.group().is_err());
    }
}
