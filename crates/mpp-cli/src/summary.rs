use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mpp_cli::inspect::task_rows;
use mpp_model::{DiagnosticReason, Project, Task, TaskId};

pub fn print_summary(path: &Path, project: &Project) {
    let properties = project.properties();
    println!("File: {}", path.display());
    if let Some(name) = &properties.application_name {
        println!("Written by: {name}");
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Property"), header_cell("Value")]);
    apply_summary_table_style(&mut table);

    let generation = properties
        .file_generation
        .map_or_else(|| "-".to_string(), |tag| format!("MPP{tag}"));
    table.add_row(vec![Cell::new("Generation"), Cell::new(generation)]);
    table.add_row(vec![
        Cell::new("Format"),
        optional_cell(properties.file_format.as_deref()),
    ]);
    table.add_row(vec![
        Cell::new("Default calendar"),
        optional_cell(properties.default_calendar_name.as_deref()),
    ]);
    table.add_row(vec![
        Cell::new("Start"),
        optional_cell(
            properties
                .start_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .as_deref(),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Obfuscated"),
        Cell::new(if properties.encrypted { "yes" } else { "no" }),
    ]);
    for (label, count) in [
        ("Tasks", project.task_count()),
        ("Resources", project.resource_count()),
        ("Assignments", project.assignment_count()),
        ("Relations", project.relations().len()),
        ("Calendars", project.calendars().count()),
        ("Tables", project.tables().len()),
        ("Views", project.views().len()),
        ("Filters", project.filters().len()),
        ("Groups", project.groups().len()),
    ] {
        table.add_row(vec![Cell::new(label), count_cell(count, Color::Cyan)]);
    }
    table.add_row(vec![
        Cell::new("Diagnostics").add_attribute(Attribute::Bold),
        count_cell(project.diagnostics().len(), Color::Yellow),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    println!("{table}");
}

pub fn print_tasks(project: &Project) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Outline"),
        header_cell("UID"),
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Start"),
        header_cell("Finish"),
        header_cell("Duration"),
    ]);
    apply_table_style(&mut table);
    for row in task_rows(project) {
        let name = format!("{}{}", "  ".repeat(row.depth), row.name);
        let name = if project
            .task(TaskId::new(row.uid))
            .is_some_and(Task::is_summary)
        {
            Cell::new(name).add_attribute(Attribute::Bold)
        } else {
            Cell::new(name)
        };
        table.add_row(vec![
            Cell::new(row.outline),
            Cell::new(row.uid),
            optional_cell(row.id.map(|id| id.to_string()).as_deref()),
            name,
            optional_cell(row.start.as_deref()),
            optional_cell(row.finish.as_deref()),
            optional_cell(row.duration.as_deref()),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    println!();
    println!("Tasks:");
    println!("{table}");
}

pub fn print_views(project: &Project) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("View"),
        header_cell("Type"),
        header_cell("Table"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for view in project.views() {
        let shown = project.view_table(view);
        let columns = shown.map(|t| {
            t.columns
                .iter()
                .map(|c| c.label().map_or_else(|| c.field.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(", ")
        });
        table.add_row(vec![
            optional_cell(view.name.as_deref()),
            Cell::new(view.view_type.name()),
            optional_cell(shown.and_then(|t| t.name.as_deref())),
            optional_cell(columns.as_deref()),
        ]);
    }
    println!();
    println!("Views:");
    println!("{table}");
}

pub fn print_diagnostics(project: &Project) {
    if project.diagnostics().is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Identifier"),
        header_cell("Code"),
        header_cell("Detail"),
    ]);
    apply_issue_table_style(&mut table);
    for diagnostic in project.diagnostics() {
        let detail = diagnostic.reason.to_string();
        let detail = detail
            .strip_prefix(diagnostic.reason.code())
            .unwrap_or(&detail)
            .trim()
            .to_string();
        table.add_row(vec![
            Cell::new(diagnostic.kind.as_str()),
            optional_cell(diagnostic.identifier.map(|id| id.to_string()).as_deref()),
            code_cell(&diagnostic.reason),
            Cell::new(detail),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    println!();
    println!("Diagnostics:");
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
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn code_cell(reason: &DiagnosticReason) -> Cell {
    let color = match reason {
        DiagnosticReason::SkippedSentinel => Color::DarkGrey,
        DiagnosticReason::DroppedDependent { .. } | DiagnosticReason::TruncatedTable { .. } => {
            Color::Red
        }
        _ => Color::Yellow,
    };
    Cell::new(reason.code()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string())
        .fg(Color::DarkGrey)
        .add_attribute(Attribute::Dim)
}
