//! Layer data records: the leaves of the hierarchy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::camera::Camera;
use crate::ids::{DataId, GroupId};
use crate::nullable::null_as_default;
use crate::visual::{HoverRow, VisualType};
use crate::{ModelError, Result};

/// Where the renderer loads a layer's features from.
///
/// GeoJSON sources carry their payload (or payload URL) inline as `data`;
/// every other source type is fetched from `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceDescriptor {
    Inline {
        #[serde(rename = "type")]
        kind: String,
        data: String,
    },
    Remote {
        #[serde(rename = "type")]
        kind: String,
        url: String,
    },
}

impl SourceDescriptor {
    pub fn kind(&self) -> &str {
        match self {
            Self::Inline { kind, .. } | Self::Remote { kind, .. } => kind,
        }
    }
}

/// Every persisted field of a layer except identity, parent and order.
///
/// A replace writes all of these; fields the caller leaves out fall back to
/// their empty defaults rather than keeping the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFields {
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
    pub source: SourceDescriptor,
    /// Serialized paint property map.
    #[serde(default = "empty_map_json")]
    pub paint: String,
    /// Serialized layout property map.
    #[serde(default = "empty_map_json")]
    pub layout: String,
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
}

fn empty_map_json() -> String {
    "{}".to_string()
}

impl DataFields {
    /// Fields for a new layer with everything but name, type and source blank.
    pub fn new(name: impl Into<String>, visual_type: VisualType, source: SourceDescriptor) -> Self {
        let (source_type, source_url) = match &source {
            SourceDescriptor::Inline { kind, data } => (kind.clone(), data.clone()),
            SourceDescriptor::Remote { kind, url } => (kind.clone(), url.clone()),
        };
        Self {
            name: name.into(),
            visual_type,
            label: String::new(),
            icon_color: String::new(),
            icon_type: String::new(),
            camera: Camera::default(),
            group_name: String::new(),
            top_layer_class: String::new(),
            info_id: String::new(),
            source_type,
            source_url,
            source_id: String::new(),
            source_layer: String::new(),
            source,
            paint: empty_map_json(),
            layout: empty_map_json(),
            hover: false,
            click: false,
            time: false,
            hover_style: String::new(),
            click_style: String::new(),
            click_header: String::new(),
            hover_content: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField {
                entity: "layer",
                field: "name",
            });
        }
        Ok(())
    }

    /// Parse the stored paint map.
    pub fn paint_map(&self) -> Result<Map<String, Value>> {
        parse_property_map(&self.paint, "paint")
    }

    /// Parse the stored layout map.
    pub fn layout_map(&self) -> Result<Map<String, Value>> {
        parse_property_map(&self.layout, "layout")
    }
}

fn parse_property_map(raw: &str, what: &str) -> Result<Map<String, Value>> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| ModelError::Message(format!("stored {what} is not a JSON object: {e}")))
}

/// A persisted layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerData {
    pub id: DataId,
    pub layer_group_id: GroupId,
    /// Zero-based position among the siblings of the same group.
    pub order: u32,
    #[serde(flatten)]
    pub fields: DataFields,
}
