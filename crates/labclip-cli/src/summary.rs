//! Group summary table.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labclip_model::LabGroup;

pub fn print_summary(groups: &[LabGroup]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Facility"),
        header_cell("Diagnosis"),
        header_cell("Items"),
        header_cell("High"),
        header_cell("Low"),
        header_cell("Merged"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_items = 0usize;
    let mut total_high = 0usize;
    let mut total_low = 0usize;
    let mut total_merged = 0usize;
    for group in groups {
        let high = group
            .items
            .iter()
            .filter(|item| item.value_status == labclip_model::ValueStatus::High)
            .count();
        let low = group
            .items
            .iter()
            .filter(|item| item.value_status == labclip_model::ValueStatus::Low)
            .count();
        let merged = group.items.iter().filter(|item| item.has_multiple_values).count();
        total_items += group.items.len();
        total_high += high;
        total_low += low;
        total_merged += merged;
        table.add_row(vec![
            Cell::new(group.date.format("%Y/%m/%d"))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&group.facility),
            Cell::new(diagnosis_label(group)),
            Cell::new(group.items.len()),
            count_cell(high, Color::Red),
            count_cell(low, Color::Yellow),
            count_cell(merged, Color::Cyan),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} groups", groups.len())).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_items).add_attribute(Attribute::Bold),
        count_cell(total_high, Color::Red).add_attribute(Attribute::Bold),
        count_cell(total_low, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(total_merged, Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn diagnosis_label(group: &LabGroup) -> String {
    match (
        group.diagnosis_code.is_empty(),
        group.diagnosis_name.is_empty(),
    ) {
        (false, false) => format!("{} {}", group.diagnosis_code, group.diagnosis_name),
        (false, true) => group.diagnosis_code.clone(),
        (true, false) => group.diagnosis_name.clone(),
        (true, true) => "-".to_string(),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
