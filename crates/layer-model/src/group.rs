use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::ids::{GroupId, SectionId};
use crate::layer::LayerData;
use crate::nullable::null_as_default;
use crate::{ModelError, Result};

/// Editable fields of a group.
///
/// `layer_section_id` is part of the form, so a replace may move the group
/// to another section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub layer_section_id: SectionId,
    #[serde(flatten)]
    pub camera: Camera,
    /// Stored as an empty string when the editor leaves it blank.
    #[serde(default, deserialize_with = "null_as_default")]
    pub info_id: String,
}

impl GroupFields {
    pub fn new(name: impl Into<String>, section: SectionId) -> Self {
        Self {
            name: name.into(),
            layer_section_id: section,
            camera: Camera::default(),
            info_id: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField {
                entity: "group",
                field: "name",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGroup {
    pub id: GroupId,
    #[serde(flatten)]
    pub fields: GroupFields,
}

/// A group with its layers sorted by order index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTree {
    #[serde(flatten)]
    pub group: LayerGroup,
    pub layers: Vec<LayerData>,
}
