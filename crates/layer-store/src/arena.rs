//! Unlocked arena holding the hierarchy.
//!
//! Records live in id-keyed maps; ordering lives only in the per-parent id
//! lists. A layer's order index is its position in its group's list, so the
//! indices of a group are always exactly `0..n`.

use std::collections::HashMap;

use layer_model::{
    DataFields, DataId, GroupFields, GroupId, GroupTree, LayerData, LayerGroup, LayerSection,
    SectionFields, SectionId, SectionTree,
};

use crate::error::{Result, StoreError};
use crate::types::{Direction, Rearranged, Removed, StoreStats};

#[derive(Debug, Clone)]
struct SectionEntry {
    fields: SectionFields,
    groups: Vec<GroupId>,
}

#[derive(Debug, Clone)]
struct GroupEntry {
    fields: GroupFields,
    layers: Vec<DataId>,
    /// Bumped whenever `layers` changes.
    revision: u64,
}

#[derive(Debug, Clone)]
struct DataEntry {
    group: GroupId,
    fields: DataFields,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    section_order: Vec<SectionId>,
    sections: HashMap<SectionId, SectionEntry>,
    groups: HashMap<GroupId, GroupEntry>,
    data: HashMap<DataId, DataEntry>,
}

fn order_index(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}

impl Arena {
    pub(crate) fn stats(&self) -> StoreStats {
        StoreStats {
            sections: self.sections.len(),
            groups: self.groups.len(),
            layers: self.data.len(),
        }
    }

    // Reads

    pub(crate) fn section_tree(&self, id: SectionId, depth: usize) -> Option<SectionTree> {
        let entry = self.sections.get(&id)?;
        let layer_groups = match depth {
            0 => Vec::new(),
            _ => entry
                .groups
                .iter()
                .filter_map(|group| self.group_tree(*group, depth - 1))
                .collect(),
        };
        Some(SectionTree {
            section: LayerSection {
                id,
                fields: entry.fields.clone(),
            },
            layer_groups,
        })
    }

    pub(crate) fn group_tree(&self, id: GroupId, depth: usize) -> Option<GroupTree> {
        let entry = self.groups.get(&id)?;
        let layers = match depth {
            0 => Vec::new(),
            _ => entry
                .layers
                .iter()
                .enumerate()
                .filter_map(|(position, layer)| self.layer_at(*layer, position))
                .collect(),
        };
        Some(GroupTree {
            group: LayerGroup {
                id,
                fields: entry.fields.clone(),
            },
            layers,
        })
    }

    pub(crate) fn layer(&self, id: DataId) -> Option<LayerData> {
        let entry = self.data.get(&id)?;
        let position = self
            .groups
            .get(&entry.group)?
            .layers
            .iter()
            .position(|layer| *layer == id)?;
        self.layer_at(id, position)
    }

    fn layer_at(&self, id: DataId, position: usize) -> Option<LayerData> {
        let entry = self.data.get(&id)?;
        Some(LayerData {
            id,
            layer_group_id: entry.group,
            order: order_index(position),
            fields: entry.fields.clone(),
        })
    }

    pub(crate) fn sections(&self, depth: usize) -> Vec<SectionTree> {
        self.section_order
            .iter()
            .filter_map(|id| self.section_tree(*id, depth))
            .collect()
    }

    pub(crate) fn revision(&self, group: GroupId) -> Option<u64> {
        self.groups.get(&group).map(|entry| entry.revision)
    }

    // Creation

    pub(crate) fn insert_section(&mut self, fields: SectionFields) -> Result<LayerSection> {
        fields.validate()?;
        let id = SectionId::generate();
        self.sections.insert(
            id,
            SectionEntry {
                fields: fields.clone(),
                groups: Vec::new(),
            },
        );
        self.section_order.push(id);
        Ok(LayerSection { id, fields })
    }

    pub(crate) fn insert_group(&mut self, fields: GroupFields) -> Result<LayerGroup> {
        fields.validate()?;
        let section = self
            .sections
            .get_mut(&fields.layer_section_id)
            .ok_or_else(|| StoreError::not_found("section", fields.layer_section_id))?;
        let id = GroupId::generate();
        section.groups.push(id);
        self.groups.insert(
            id,
            GroupEntry {
                fields: fields.clone(),
                layers: Vec::new(),
                revision: 0,
            },
        );
        Ok(LayerGroup { id, fields })
    }

    pub(crate) fn insert_data(&mut self, group: GroupId, fields: DataFields) -> Result<LayerData> {
        fields.validate()?;
        let entry = self
            .groups
            .get_mut(&group)
            .ok_or_else(|| StoreError::not_found("group", group))?;
        let id = DataId::generate();
        let order = order_index(entry.layers.len());
        entry.layers.push(id);
        entry.revision += 1;
        self.data.insert(
            id,
            DataEntry {
                group,
                fields: fields.clone(),
            },
        );
        Ok(LayerData {
            id,
            layer_group_id: group,
            order,
            fields,
        })
    }

    // Full replace

    pub(crate) fn replace_section(
        &mut self,
        id: SectionId,
        fields: SectionFields,
    ) -> Result<LayerSection> {
        fields.validate()?;
        let entry = self
            .sections
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("section", id))?;
        entry.fields = fields.clone();
        Ok(LayerSection { id, fields })
    }

    /// Replace every field of a group, moving it when the form names another section.
    pub(crate) fn replace_group(&mut self, id: GroupId, fields: GroupFields) -> Result<LayerGroup> {
        fields.validate()?;
        let previous_section = self
            .groups
            .get(&id)
            .map(|entry| entry.fields.layer_section_id)
            .ok_or_else(|| StoreError::not_found("group", id))?;
        let target_section = fields.layer_section_id;
        if !self.sections.contains_key(&target_section) {
            return Err(StoreError::not_found("section", target_section));
        }

        if previous_section != target_section {
            if let Some(section) = self.sections.get_mut(&previous_section) {
                section.groups.retain(|group| *group != id);
            }
            if let Some(section) = self.sections.get_mut(&target_section) {
                section.groups.push(id);
            }
            tracing::debug!(
                group = %id,
                from = %previous_section,
                to = %target_section,
                "moved group"
            );
        }
        if let Some(entry) = self.groups.get_mut(&id) {
            entry.fields = fields.clone();
        }
        Ok(LayerGroup { id, fields })
    }

    /// Replace every field of a layer. Parent group and order are kept.
    pub(crate) fn replace_data(&mut self, id: DataId, fields: DataFields) -> Result<LayerData> {
        fields.validate()?;
        let entry = self
            .data
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("layer", id))?;
        entry.fields = fields;
        self.layer(id).ok_or_else(|| StoreError::not_found("layer", id))
    }

    // Deletion

    pub(crate) fn remove_section(&mut self, id: SectionId) -> Result<Removed> {
        let entry = self
            .sections
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("section", id))?;
        self.section_order.retain(|section| *section != id);

        let mut removed = Removed {
            sections: 1,
            ..Removed::default()
        };
        for group in entry.groups {
            removed.layers += self.drop_group(group);
            removed.groups += 1;
        }
        Ok(removed)
    }

    pub(crate) fn remove_group(&mut self, id: GroupId) -> Result<Removed> {
        let section = self
            .groups
            .get(&id)
            .map(|entry| entry.fields.layer_section_id)
            .ok_or_else(|| StoreError::not_found("group", id))?;
        if let Some(entry) = self.sections.get_mut(&section) {
            entry.groups.retain(|group| *group != id);
        }
        let layers = self.drop_group(id);
        Ok(Removed {
            groups: 1,
            layers,
            ..Removed::default()
        })
    }

    /// Remove a group and its layers without touching the parent section.
    fn drop_group(&mut self, id: GroupId) -> usize {
        let Some(entry) = self.groups.remove(&id) else {
            return 0;
        };
        for layer in &entry.layers {
            self.data.remove(layer);
        }
        entry.layers.len()
    }

    /// Remove a layer; later siblings shift up so indices stay contiguous.
    pub(crate) fn remove_data(&mut self, id: DataId) -> Result<Removed> {
        let entry = self
            .data
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("layer", id))?;
        if let Some(group) = self.groups.get_mut(&entry.group) {
            group.layers.retain(|layer| *layer != id);
            group.revision += 1;
        }
        Ok(Removed {
            layers: 1,
            ..Removed::default()
        })
    }

    // Ordering

    /// Swap a layer with its neighbour in `direction`.
    ///
    /// When `expected_revision` is given it must equal the group's current
    /// revision, otherwise nothing changes and a conflict is returned.
    pub(crate) fn shift(
        &mut self,
        id: DataId,
        direction: Direction,
        expected_revision: Option<u64>,
    ) -> Result<Rearranged> {
        let group_id = self
            .data
            .get(&id)
            .map(|entry| entry.group)
            .ok_or_else(|| StoreError::not_found("layer", id))?;
        let group = self
            .groups
            .get_mut(&group_id)
            .ok_or_else(|| StoreError::not_found("group", group_id))?;

        if let Some(expected) = expected_revision
            && expected != group.revision
        {
            return Err(StoreError::Conflict {
                group: group_id,
                expected,
                actual: group.revision,
            });
        }

        let position = group
            .layers
            .iter()
            .position(|layer| *layer == id)
            .ok_or_else(|| StoreError::not_found("layer", id))?;
        let neighbour = match direction {
            Direction::Up => position.checked_sub(1),
            Direction::Down => Some(position + 1).filter(|next| *next < group.layers.len()),
        };
        let Some(neighbour) = neighbour else {
            return Ok(Rearranged::Unchanged {
                at: order_index(position),
                revision: group.revision,
            });
        };

        group.layers.swap(position, neighbour);
        group.revision += 1;
        Ok(Rearranged::Moved {
            from: order_index(position),
            to: order_index(neighbour),
            revision: group.revision,
        })
    }

    // Snapshots

    /// Rebuild an arena from full section trees.
    ///
    /// Layers are placed by their stored order index (ties keep file order)
    /// and then renumbered from zero. Parent ids are taken from the nesting.
    pub(crate) fn from_trees(trees: Vec<SectionTree>) -> std::result::Result<Self, String> {
        let mut arena = Self::default();
        for tree in trees {
            let section_id = tree.section.id;
            if arena.sections.contains_key(&section_id) {
                return Err(format!("duplicate section id {section_id}"));
            }
            let mut group_ids = Vec::with_capacity(tree.layer_groups.len());
            for group_tree in tree.layer_groups {
                let group_id = group_tree.group.id;
                if arena.groups.contains_key(&group_id) {
                    return Err(format!("duplicate group id {group_id}"));
                }
                let mut layers = group_tree.layers;
                layers.sort_by_key(|layer| layer.order);
                let mut layer_ids = Vec::with_capacity(layers.len());
                for layer in layers {
                    if arena.data.contains_key(&layer.id) {
                        return Err(format!("duplicate layer id {}", layer.id));
                    }
                    layer_ids.push(layer.id);
                    arena.data.insert(
                        layer.id,
                        DataEntry {
                            group: group_id,
                            fields: layer.fields,
                        },
                    );
                }
                let mut fields = group_tree.group.fields;
                fields.layer_section_id = section_id;
                arena.groups.insert(
                    group_id,
                    GroupEntry {
                        fields,
                        layers: layer_ids,
                        revision: 0,
                    },
                );
                group_ids.push(group_id);
            }
            arena.sections.insert(
                section_id,
                SectionEntry {
                    fields: tree.section.fields,
                    groups: group_ids,
                },
            );
            arena.section_order.push(section_id);
        }
        Ok(arena)
    }

    #[cfg(test)]
    pub(crate) fn layer_ids(&self, group: GroupId) -> Vec<DataId> {
        self.groups
            .get(&group)
            .map(|entry| entry.layers.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_model::{SourceDescriptor, VisualType};

    fn layer_fields(name: &str) -> DataFields {
        let source = SourceDescriptor::Remote {
            kind: "vector".to_string(),
            url: "mapbox://streets".to_string(),
        };
        DataFields::new(name, VisualType::Fill, source)
    }

    fn arena_with_layers(count: usize) -> (Arena, GroupId, Vec<DataId>) {
        let mut arena = Arena::default();
        let section = arena
            .insert_section(SectionFields::new("Base"))
            .expect("section");
        let group = arena
            .insert_group(GroupFields::new("Roads", section.id))
            .expect("group");
        let ids = (0..count)
            .map(|i| {
                arena
                    .insert_data(group.id, layer_fields(&format!("layer {i}")))
                    .expect("layer")
                    .id
            })
            .collect();
        (arena, group.id, ids)
    }

    #[test]
    fn created_layers_take_the_next_order_index() {
        let (arena, group, ids) = arena_with_layers(3);
        let tree = arena.group_tree(group, 1).expect("group");
        let orders: Vec<u32> = tree.layers.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(tree.layers[2].id, ids[2]);
        assert_eq!(tree.layers[0].fields.visual_type, VisualType::Fill);
    }

    #[test]
    fn shift_at_the_edges_is_a_no_op() {
        let (mut arena, group, ids) = arena_with_layers(2);
        let before = arena.revision(group).expect("revision");

        let up = arena.shift(ids[0], Direction::Up, None).expect("shift");
        let down = arena.shift(ids[1], Direction::Down, None).expect("shift");

        assert_eq!(up, Rearranged::Unchanged { at: 0, revision: before });
        assert_eq!(down, Rearranged::Unchanged { at: 1, revision: before });
        assert_eq!(arena.layer_ids(group), ids);
    }

    #[test]
    fn stale_revision_conflicts_without_changes() {
        let (mut arena, group, ids) = arena_with_layers(3);
        let current = arena.revision(group).expect("revision");

        let err = arena
            .shift(ids[2], Direction::Up, Some(current - 1))
            .expect_err("conflict");
        assert!(matches!(err, StoreError::Conflict { actual, .. } if actual == current));
        assert_eq!(arena.layer_ids(group), ids);

        let moved = arena
            .shift(ids[2], Direction::Up, Some(current))
            .expect("shift");
        assert_eq!(moved.revision(), current + 1);
    }

    #[test]
    fn deleting_a_layer_compacts_its_siblings() {
        let (mut arena, group, ids) = arena_with_layers(4);
        arena.remove_data(ids[1]).expect("remove");

        let layer = arena.layer(ids[3]).expect("layer");
        assert_eq!(layer.order, 2);
        assert_eq!(arena.layer_ids(group), vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn replacing_a_group_can_move_it_between_sections() {
        let (mut arena, group, _) = arena_with_layers(1);
        let other = arena
            .insert_section(SectionFields::new("Overlays"))
            .expect("section");

        let mut fields = arena.group_tree(group, 0).expect("group").group.fields;
        fields.layer_section_id = other.id;
        arena.replace_group(group, fields).expect("replace");

        let moved_to = arena.section_tree(other.id, 1).expect("section");
        assert_eq!(moved_to.layer_groups.len(), 1);
        assert_eq!(arena.sections(1)[0].layer_groups.len(), 0);
    }

    #[test]
    fn depth_limits_nesting() {
        let (arena, _, _) = arena_with_layers(2);
        let shallow = &arena.sections(0)[0];
        assert!(shallow.layer_groups.is_empty());
        let one = &arena.sections(1)[0];
        assert!(one.layer_groups[0].layers.is_empty());
        let full = &arena.sections(2)[0];
        assert_eq!(full.layer_groups[0].layers.len(), 2);
    }
}
