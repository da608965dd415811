//! Public value types returned by the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use layer_model::{DataId, GroupId, GroupTree, LayerData, ModelError, SectionId, SectionTree};

/// Read depth that returns every level below the requested record.
pub const FULL_DEPTH: usize = 2;

/// Id of any record in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Section(SectionId),
    Group(GroupId),
    Data(DataId),
}

impl From<SectionId> for NodeId {
    fn from(id: SectionId) -> Self {
        Self::Section(id)
    }
}

impl From<GroupId> for NodeId {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}

impl From<DataId> for NodeId {
    fn from(id: DataId) -> Self {
        Self::Data(id)
    }
}

/// Result of [`crate::HierarchyStore::get`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayerNode {
    Section(SectionTree),
    Group(GroupTree),
    Data(LayerData),
}

/// Which neighbour a layer swaps with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards order index 0.
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("up") {
            Ok(Self::Up)
        } else if value.eq_ignore_ascii_case("down") {
            Ok(Self::Down)
        } else {
            Err(ModelError::Message(format!(
                "unknown rearrange direction '{value}', expected Up or Down"
            )))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "Up",
            Self::Down => "Down",
        })
    }
}

/// Outcome of a rearrange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rearranged {
    /// The layer swapped places with its neighbour.
    Moved { from: u32, to: u32, revision: u64 },
    /// Already first (moving up) or last (moving down).
    Unchanged { at: u32, revision: u64 },
}

impl Rearranged {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// Order index of the layer after the request.
    pub fn order(&self) -> u32 {
        match self {
            Self::Moved { to, .. } => *to,
            Self::Unchanged { at, .. } => *at,
        }
    }

    /// Group revision after the request.
    pub fn revision(&self) -> u64 {
        match self {
            Self::Moved { revision, .. } | Self::Unchanged { revision, .. } => *revision,
        }
    }
}

/// Number of records removed by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Removed {
    pub sections: usize,
    pub groups: usize,
    pub layers: usize,
}

/// Record counts across the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub sections: usize,
    pub groups: usize,
    pub layers: usize,
}
