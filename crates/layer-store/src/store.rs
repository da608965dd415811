//! Thread-safe hierarchy store.

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use layer_model::{
    DataFields, DataId, GroupFields, GroupId, GroupTree, LayerData, LayerGroup, LayerSection,
    SectionFields, SectionId, SectionTree,
};

use crate::arena::Arena;
use crate::error::{Result, StoreError};
use crate::snapshot::{Snapshot, read_snapshot, write_snapshot};
use crate::types::{Direction, FULL_DEPTH, LayerNode, NodeId, Rearranged, Removed, StoreStats};

/// Section → Group → Data hierarchy with strict sibling ordering.
///
/// Every mutation takes the single writer lock, so two rearranges touching
/// the same siblings are serialized and readers see either the state before
/// or after a change, never a partial one.
#[derive(Debug, Default)]
pub struct HierarchyStore {
    arena: RwLock<Arena>,
}

impl HierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Arena>> {
        self.arena.read().map_err(|_| {
            tracing::error!("hierarchy lock poisoned");
            StoreError::Storage("hierarchy lock poisoned".to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Arena>> {
        self.arena.write().map_err(|_| {
            tracing::error!("hierarchy lock poisoned");
            StoreError::Storage("hierarchy lock poisoned".to_string())
        })
    }

    pub fn stats(&self) -> Result<StoreStats> {
        Ok(self.read()?.stats())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Depth-limited read of any record.
    ///
    /// `depth` counts nesting levels below the record: 0 returns the record
    /// alone, [`FULL_DEPTH`] returns everything beneath it. Layers have no
    /// children, so depth does not affect them.
    pub fn get(&self, id: impl Into<NodeId>, depth: usize) -> Result<Option<LayerNode>> {
        let arena = self.read()?;
        Ok(match id.into() {
            NodeId::Section(id) => arena.section_tree(id, depth).map(LayerNode::Section),
            NodeId::Group(id) => arena.group_tree(id, depth).map(LayerNode::Group),
            NodeId::Data(id) => arena.layer(id).map(LayerNode::Data),
        })
    }

    /// A section with all its groups and layers.
    pub fn get_section(&self, id: SectionId) -> Result<Option<SectionTree>> {
        Ok(self.read()?.section_tree(id, FULL_DEPTH))
    }

    /// A group with its layers.
    pub fn get_group(&self, id: GroupId) -> Result<Option<GroupTree>> {
        Ok(self.read()?.group_tree(id, FULL_DEPTH))
    }

    pub fn get_data(&self, id: DataId) -> Result<Option<LayerData>> {
        Ok(self.read()?.layer(id))
    }

    /// Every section as a full tree, in creation order.
    pub fn list_sections(&self) -> Result<Vec<SectionTree>> {
        Ok(self.read()?.sections(FULL_DEPTH))
    }

    /// Current ordering revision of a group, for [`rearrange`](Self::rearrange).
    pub fn group_revision(&self, id: GroupId) -> Result<u64> {
        self.read()?
            .revision(id)
            .ok_or_else(|| StoreError::not_found("group", id))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    pub fn create_section(&self, fields: SectionFields) -> Result<LayerSection> {
        let section = self.write()?.insert_section(fields)?;
        tracing::info!(section = %section.id, name = %section.fields.name, "created section");
        Ok(section)
    }

    pub fn create_group(&self, fields: GroupFields) -> Result<LayerGroup> {
        let group = self.write()?.insert_group(fields)?;
        tracing::info!(
            group = %group.id,
            section = %group.fields.layer_section_id,
            name = %group.fields.name,
            "created group"
        );
        Ok(group)
    }

    /// Append a layer to `group`; it takes the next order index.
    pub fn create_data(&self, group: GroupId, fields: DataFields) -> Result<LayerData> {
        let layer = self.write()?.insert_data(group, fields)?;
        tracing::info!(
            layer = %layer.id,
            group = %group,
            order = layer.order,
            visual_type = %layer.fields.visual_type,
            "created layer"
        );
        Ok(layer)
    }

    // =========================================================================
    // Full replace
    // =========================================================================

    /// Overwrite every field of a section. Nothing is merged with the stored record.
    pub fn replace_section(&self, id: SectionId, fields: SectionFields) -> Result<LayerSection> {
        let section = self.write()?.replace_section(id, fields)?;
        tracing::info!(section = %id, "replaced section");
        Ok(section)
    }

    /// Overwrite every field of a group, re-parenting it if the section changed.
    pub fn replace_group(&self, id: GroupId, fields: GroupFields) -> Result<LayerGroup> {
        let group = self.write()?.replace_group(id, fields)?;
        tracing::info!(group = %id, "replaced group");
        Ok(group)
    }

    /// Overwrite every field of a layer. Parent group and order index are kept.
    pub fn replace_data(&self, id: DataId, fields: DataFields) -> Result<LayerData> {
        let layer = self.write()?.replace_data(id, fields)?;
        tracing::info!(layer = %id, "replaced layer");
        Ok(layer)
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Delete a section with its groups and their layers.
    pub fn delete_section(&self, id: SectionId) -> Result<Removed> {
        let removed = self.write()?.remove_section(id)?;
        tracing::info!(
            section = %id,
            groups = removed.groups,
            layers = removed.layers,
            "deleted section"
        );
        Ok(removed)
    }

    /// Delete a group with its layers.
    pub fn delete_group(&self, id: GroupId) -> Result<Removed> {
        let removed = self.write()?.remove_group(id)?;
        tracing::info!(group = %id, layers = removed.layers, "deleted group");
        Ok(removed)
    }

    /// Delete a layer and renumber its later siblings.
    pub fn delete_data(&self, id: DataId) -> Result<Removed> {
        let removed = self.write()?.remove_data(id)?;
        tracing::info!(layer = %id, "deleted layer");
        Ok(removed)
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Swap a layer with its previous sibling. No-op when already first.
    pub fn move_up(&self, id: DataId) -> Result<Rearranged> {
        self.shift(id, Direction::Up, None)
    }

    /// Swap a layer with its next sibling. No-op when already last.
    pub fn move_down(&self, id: DataId) -> Result<Rearranged> {
        self.shift(id, Direction::Down, None)
    }

    /// Move a layer only if its group is still at `expected_revision`.
    pub fn rearrange(
        &self,
        id: DataId,
        direction: Direction,
        expected_revision: u64,
    ) -> Result<Rearranged> {
        self.shift(id, direction, Some(expected_revision))
    }

    fn shift(
        &self,
        id: DataId,
        direction: Direction,
        expected_revision: Option<u64>,
    ) -> Result<Rearranged> {
        let outcome = self.write()?.shift(id, direction, expected_revision);
        match &outcome {
            Ok(Rearranged::Moved { from, to, revision }) => {
                tracing::info!(layer = %id, %direction, from, to, revision, "rearranged layer");
            }
            Ok(Rearranged::Unchanged { at, .. }) => {
                tracing::debug!(layer = %id, %direction, at, "layer already at the edge");
            }
            Err(StoreError::Conflict {
                expected, actual, ..
            }) => {
                tracing::warn!(layer = %id, expected, actual, "rearrange conflict");
            }
            Err(_) => {}
        }
        outcome
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Capture the whole hierarchy.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot::new(self.list_sections()?))
    }

    /// Build a store from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> std::result::Result<Self, String> {
        let arena = Arena::from_trees(snapshot.layer_sections)?;
        Ok(Self {
            arena: RwLock::new(arena),
        })
    }

    /// Write the whole hierarchy to `path` as JSON.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        write_snapshot(&self.snapshot()?, path)
    }

    /// Load a store previously written by [`save_snapshot`](Self::save_snapshot).
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let snapshot = read_snapshot(path)?;
        let store = Self::from_snapshot(snapshot).map_err(|reason| StoreError::Snapshot {
            path: path.to_path_buf(),
            reason,
        })?;
        if let Ok(stats) = store.stats() {
            tracing::info!(
                path = %path.display(),
                sections = stats.sections,
                groups = stats.groups,
                layers = stats.layers,
                "loaded snapshot"
            );
        }
        Ok(store)
    }

    /// Load `path` if it exists, otherwise start empty.
    pub fn open(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_snapshot(path)
        } else {
            tracing::debug!(path = %path.display(), "no snapshot yet, starting empty");
            Ok(Self::new())
        }
    }
}
