use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fwf_ingest::{InferredTypes, Row};
use fwf_model::Tape;

use crate::types::{
    ConvertResult, InferResult, Outcome, PreviewResult, SqlResult, TapeChange, TapeResult,
};

pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Tape(result) => print_tape_result(result),
        Outcome::Convert(result) => print_convert_result(result),
        Outcome::Infer(result) => print_infer_result(result),
        Outcome::Sql(result) => print_sql_result(result),
        Outcome::Preview(result) => print_preview_result(result),
    }
}

fn print_tape_result(result: &TapeResult) {
    match &result.change {
        Some(TapeChange::Added(name)) => println!("Added field '{name}'"),
        Some(TapeChange::Replaced(name)) => println!("Replaced field '{name}'"),
        Some(TapeChange::Altered(name)) => println!("Altered field '{name}'"),
        Some(TapeChange::Removed(name)) => println!("Removed field '{name}'"),
        Some(TapeChange::NotFound(name)) => println!("No field named '{name}'; tape unchanged"),
        None => {}
    }
    println!("Tape: {}", result.path.display());
    println!("{}", tape_table(&result.tape));
}

fn print_convert_result(result: &ConvertResult) {
    println!("{}", conversion_table(result));
}

fn print_infer_result(result: &InferResult) {
    println!("{}", inference_table(&result.tape, &result.inferred));
    if let Some(path) = &result.saved_to {
        println!("Saved tape: {}", path.display());
    } else if !result.inferred.is_empty() {
        println!("Tape not saved (use --write to keep these types)");
    }
}

fn print_sql_result(result: &SqlResult) {
    match &result.written_to {
        Some(path) => println!("Wrote script for table {} to {}", result.table_name, path.display()),
        None => print!("{}", result.script),
    }
}

fn print_preview_result(result: &PreviewResult) {
    println!("{}", preview_table(&result.tape, &result.rows));
}

/// Fields of a tape: position, name, range, width and declared type.
pub fn tape_table(tape: &Tape) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Width"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    for index in [0, 2, 3, 4] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (index, (name, field)) in tape.iter().enumerate() {
        let type_cell = match field.declared_type() {
            Some(storage) => Cell::new(storage),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(field.start()),
            Cell::new(field.end()),
            Cell::new(field.width()),
            type_cell,
        ]);
    }
    if let Some(width) = tape.record_width() {
        table.add_row(vec![
            dim_cell(""),
            Cell::new("record").fg(Color::Cyan),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(width).fg(Color::Cyan),
            dim_cell(""),
        ]);
    }
    table
}

/// Types after inference, marking which ones were just inferred.
pub fn inference_table(tape: &Tape, inferred: &InferredTypes) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Origin"),
    ]);
    apply_table_style(&mut table);
    for (name, field) in tape {
        let (storage, origin) = match (inferred.get(name), field.declared_type()) {
            (Some(storage), _) => (Cell::new(storage), Cell::new("inferred").fg(Color::Green)),
            (None, Some(storage)) => (Cell::new(storage), dim_cell("declared")),
            (None, None) => (dim_cell("-"), dim_cell("untyped")),
        };
        table.add_row(vec![Cell::new(name), storage, origin]);
    }
    table
}

/// Decoded rows with one column per field. Values are shown untrimmed.
pub fn preview_table(tape: &Tape, rows: &[Row]) -> Table {
    let mut table = Table::new();
    table.set_header(tape.names().map(header_cell).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    table
}

pub fn conversion_table(result: &ConvertResult) -> Table {
    let summary = &result.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Output"),
        header_cell("Lines"),
        header_cell("Duration"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(result.source.display()),
        Cell::new(summary.sink_path.display()),
        Cell::new(summary.lines).add_attribute(Attribute::Bold),
        dim_cell(format!("{:.2}s", summary.duration.as_secs_f64())),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use fwf_ingest::ConversionSummary;
    use fwf_model::StorageType;

    use super::*;

    fn render(mut table: Table) -> String {
        table.force_no_tty();
        table.to_string()
    }

    fn tape() -> Tape {
        Tape::from_fields([
            ("id", 0, 4, Some(StorageType::Integer)),
            ("name", 4, 14, None),
        ])
        .unwrap()
    }

    #[test]
    fn tape_table_lists_fields_in_order() {
        let text = render(tape_table(&tape()));
        let lines: Vec<&str> = text.lines().collect();
        let id = lines.iter().position(|line| line.contains(" id ")).unwrap();
        let name = lines.iter().position(|line| line.contains(" name ")).unwrap();
        assert!(id < name);
        assert!(text.contains("INT"));
        assert!(text.contains("record"));
        assert!(text.contains("14"));
    }

    #[test]
    fn empty_tape_has_header_only() {
        let text = render(tape_table(&Tape::new()));
        assert!(text.contains("Field"));
        assert!(!text.contains("record"));
    }

    #[test]
    fn preview_shows_raw_values() {
        let rows = vec![Row::from(vec!["1001".to_string(), "ALICE".to_string()])];
        let text = render(preview_table(&tape(), &rows));
        assert!(text.contains("1001"));
        assert!(text.contains("ALICE"));
        assert!(text.contains("name"));
    }

    #[test]
    fn conversion_table_shows_counts() {
        let result = ConvertResult {
            source: PathBuf::from("people.txt"),
            summary: ConversionSummary {
                sink_path: PathBuf::from("people.csv"),
                lines: 42,
                duration: Duration::from_millis(1500),
            },
        };
        let text = render(conversion_table(&result));
        assert!(text.contains("people.csv"));
        assert!(text.contains("42"));
        assert!(text.contains("1.50s"));
    }
}
