//! Table rendering of the layer hierarchy.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use layer_model::{LayerData, SectionTree, SourceDescriptor};

const COLUMNS: [&str; 6] = ["Section", "Group", "Layer", "Type", "Order", "Source"];

pub fn print_tree(sections: &[SectionTree]) {
    if sections.is_empty() {
        println!("No layer sections.");
        return;
    }
    println!("{}", render_tree(sections));
    let groups: usize = sections.iter().map(|s| s.layer_groups.len()).sum();
    let layers: usize = sections.iter().map(SectionTree::layer_count).sum();
    println!(
        "{} section(s), {groups} group(s), {layers} layer(s)",
        sections.len()
    );
}

/// One row per layer; sections and groups without children get a row of their own.
pub fn render_tree(sections: &[SectionTree]) -> Table {
    let mut table = Table::new();
    table.set_header(COLUMNS.map(header_cell));
    apply_tree_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);

    for tree in sections {
        let section_name = &tree.section.fields.name;
        if tree.layer_groups.is_empty() {
            table.add_row(vec![
                section_cell(section_name),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
            continue;
        }
        for group in &tree.layer_groups {
            let group_name = &group.group.fields.name;
            if group.layers.is_empty() {
                table.add_row(vec![
                    section_cell(section_name),
                    group_cell(group_name),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                ]);
                continue;
            }
            for layer in &group.layers {
                table.add_row(layer_row(section_name, group_name, layer));
            }
        }
    }
    table
}

fn layer_row(section: &str, group: &str, layer: &LayerData) -> Vec<Cell> {
    vec![
        section_cell(section),
        group_cell(group),
        Cell::new(&layer.fields.name),
        Cell::new(layer.fields.visual_type).fg(Color::Green),
        Cell::new(layer.order),
        source_cell(&layer.fields.source),
    ]
}

fn source_cell(source: &SourceDescriptor) -> Cell {
    let (kind, location) = match source {
        SourceDescriptor::Inline { kind, data } => (kind, data),
        SourceDescriptor::Remote { kind, url } => (kind, url),
    };
    if kind.is_empty() && location.is_empty() {
        return dim_cell("-");
    }
    Cell::new(format!("{kind}: {location}"))
}

fn apply_tree_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Percentage(35)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn section_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn group_cell(name: &str) -> Cell {
    Cell::new(name).fg(Color::Magenta)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
