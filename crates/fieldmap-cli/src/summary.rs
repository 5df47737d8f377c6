use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmap_editor::{EditorSummary, MappingEditor, MappingRowEditor, RowState};
use fieldmap_model::{EntityType, FieldCatalog, MappingRow, SyncSettings, group_by_entity};

use fieldmap_cli::edit::EditReport;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn print_catalog(scope: &str, catalog: &FieldCatalog) {
    println!("Scope: {scope}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Key"),
        header_cell("Name"),
    ]);
    apply_table_style(&mut table);
    for entity in EntityType::ALL {
        let fields = catalog.fields(entity);
        if fields.is_empty() {
            table.add_row(vec![
                Cell::new(entity.label()),
                dim_cell("-"),
                dim_cell("no fields"),
            ]);
            continue;
        }
        for field in fields {
            table.add_row(vec![
                Cell::new(entity.label()),
                Cell::new(&field.key),
                Cell::new(&field.name),
            ]);
        }
    }
    println!("{table}");
    println!("{} fields", catalog.len());
}

/// Prints every row in display order with its completion state.
pub fn print_rows(editor: &MappingEditor) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Source"),
        header_cell("Entity"),
        header_cell("Target"),
        header_cell("State"),
    ]);
    apply_table_style(&mut table);
    for (index, row) in editor.rows().iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            optional_cell(row.source()),
            optional_cell(row.entity().map(|entity| entity.label())),
            target_cell(editor, row),
            state_cell(row.state()),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    println!("{table}");
    print_counts(editor.summary());
}

/// Prints the saved mappings grouped by entity type.
pub fn print_grouped(mappings: &[MappingRow]) {
    if mappings.is_empty() {
        println!("No mappings stored.");
        return;
    }
    for (entity, rows) in group_by_entity(mappings) {
        println!("{} ({})", entity.label(), rows.len());
        for row in rows {
            println!("  {} -> {}", row.source, row.target);
        }
    }
}

pub fn print_report(report: &EditReport) {
    println!(
        "Removed {}, added {}.",
        report.removed,
        report.added.len()
    );
    if report.blocked > 0 {
        println!(
            "{} removal(s) refused: the editor keeps a minimum number of rows.",
            report.blocked
        );
    }
}

pub fn print_settings(settings: &SyncSettings) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Setting"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("check_organizations"),
        bool_cell(settings.check_organizations),
    ]);
    table.add_row(vec![
        Cell::new("check_persons"),
        bool_cell(settings.check_persons),
    ]);
    table.add_row(vec![
        Cell::new("sequential_status"),
        bool_cell(settings.sequential_status),
    ]);
    println!("{table}");
}

fn print_counts(summary: EditorSummary) {
    if summary.incomplete > 0 {
        println!(
            "{} rows, {} complete, {} incomplete (left out on save)",
            summary.rows, summary.complete, summary.incomplete
        );
    } else {
        println!("{} rows, all complete", summary.rows);
    }
}

/// Shows a target that is not in the loaded catalog dimmed.
fn target_cell(editor: &MappingEditor, row: &MappingRowEditor) -> Cell {
    let Some(target) = row.target() else {
        return dim_cell("-");
    };
    let known = row
        .entity()
        .and_then(|entity| editor.cache().catalog()?.find(entity, target))
        .map(|field| format!("{target} ({})", field.name));
    match (known, row.pending_target()) {
        (Some(label), _) => Cell::new(label),
        (None, Some(_)) => dim_cell(&format!("{target} (not loaded)")),
        (None, None) => Cell::new(target),
    }
}

fn state_cell(state: RowState) -> Cell {
    match state {
        RowState::Complete => Cell::new(state.label()).fg(Color::Green),
        RowState::EntitySelected => Cell::new(state.label()).fg(Color::Yellow),
        RowState::Unset => dim_cell(state.label()),
    }
}

fn bool_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Yellow)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
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

fn dim_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::DarkGrey)
}
