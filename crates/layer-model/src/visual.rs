//! Visual types and interaction enums shared by every layer record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::nullable::null_as_default;

/// Rendering category of a layer, which decides the paint/layout keys it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualType {
    Symbol,
    Fill,
    Line,
    Circle,
    Heatmap,
    FillExtrusion,
    Raster,
    RasterParticle,
    Hillshade,
    Model,
    Background,
    Sky,
    Slot,
    Clip,
}

impl VisualType {
    pub const ALL: [VisualType; 14] = [
        Self::Symbol,
        Self::Fill,
        Self::Line,
        Self::Circle,
        Self::Heatmap,
        Self::FillExtrusion,
        Self::Raster,
        Self::RasterParticle,
        Self::Hillshade,
        Self::Model,
        Self::Background,
        Self::Sky,
        Self::Slot,
        Self::Clip,
    ];

    /// Wire name used by the map renderer.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Fill => "fill",
            Self::Line => "line",
            Self::Circle => "circle",
            Self::Heatmap => "heatmap",
            Self::FillExtrusion => "fill-extrusion",
            Self::Raster => "raster",
            Self::RasterParticle => "raster-particle",
            Self::Hillshade => "hillshade",
            Self::Model => "model",
            Self::Background => "background",
            Self::Sky => "sky",
            Self::Slot => "slot",
            Self::Clip => "clip",
        }
    }

    /// Whether the style compiler derives type-specific paint keys for this type.
    pub const fn is_compiled(&self) -> bool {
        matches!(self, Self::Symbol | Self::Fill | Self::Line | Self::Circle)
    }
}

impl fmt::Display for VisualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualType {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownVisualType(value.to_string()))
    }
}

/// Field shown in one row of a hover popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum HoverFieldKind {
    Name,
    Lot,
    DateStart,
    DateEnd,
    Address,
    /// Row added in the editor without a field picked yet.
    #[default]
    #[serde(rename = "")]
    Unset,
}

/// One `{label, type}` row of hover popup content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: HoverFieldKind,
}
