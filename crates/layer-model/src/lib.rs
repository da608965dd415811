//! Data model for the layer atlas.
//!
//! The hierarchy has three levels:
//!
//! - [`LayerSection`]: a named collection of groups
//! - [`LayerGroup`]: camera defaults plus an ordered list of layers
//! - [`LayerData`]: one renderable map layer with its compiled style
//!
//! Each record is split into an id (plus parent and order, where relevant)
//! and a `*Fields` struct holding everything a full-replace update rewrites.

pub mod camera;
pub mod error;
pub mod group;
pub mod ids;
pub mod layer;
pub mod nullable;
pub mod section;
pub mod visual;

pub use camera::Camera;
pub use error::{ModelError, Result};
pub use group::{GroupFields, GroupTree, LayerGroup};
pub use ids::{DataId, GroupId, SectionId};
pub use layer::{DataFields, LayerData, SourceDescriptor};
pub use nullable::null_as_default;
pub use section::{LayerSection, SectionFields, SectionTree};
pub use visual::{HoverFieldKind, HoverRow, VisualType};
