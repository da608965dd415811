use serde::{Deserialize, Serialize};

use crate::group::GroupTree;
use crate::ids::SectionId;
use crate::nullable::null_as_default;
use crate::{ModelError, Result};

/// Editable fields of a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl SectionFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField {
                entity: "section",
                field: "name",
            });
        }
        Ok(())
    }
}

/// Top level of the layer hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSection {
    pub id: SectionId,
    #[serde(flatten)]
    pub fields: SectionFields,
}

/// A section with its groups and their layers nested in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTree {
    #[serde(flatten)]
    pub section: LayerSection,
    pub layer_groups: Vec<GroupTree>,
}

impl SectionTree {
    /// Total number of layer records below this section.
    pub fn layer_count(&self) -> usize {
        self.layer_groups.iter().map(|g| g.layers.len()).sum()
    }
}
