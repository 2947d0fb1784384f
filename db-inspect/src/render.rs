//! Grid rendering of table snapshots
//!
//! Every cell is boxed, header included. Numeric columns are right-aligned.

use crate::snapshot::TableSnapshot;
use common::CellValue;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

/// Render a snapshot as a grid with a header row of column names
pub fn render_grid(snapshot: &TableSnapshot) -> String {
    let mut builder = Builder::default();
    builder.push_record(snapshot.columns.iter().cloned());
    for row in &snapshot.rows {
        builder.push_record(row.iter().map(|cell| cell.to_string()));
    }

    let mut table = builder.build();
    table.with(Style::ascii());

    for idx in numeric_columns(snapshot) {
        table.with(Modify::new(Columns::single(idx)).with(Alignment::right()));
    }

    table.to_string()
}

/// Columns whose non-null values are all numeric
fn numeric_columns(snapshot: &TableSnapshot) -> Vec<usize> {
    (0..snapshot.columns.len())
        .filter(|&idx| {
            let mut values = snapshot
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|cell| **cell != CellValue::Null)
                .peekable();
            values.peek().is_some() && values.all(|cell| cell.is_numeric())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TableSnapshot {
        TableSnapshot {
            table: "users".to_string(),
            columns: vec!["id".to_string(), "name".to_string(), "bio".to_string()],
            rows: vec![
                vec![CellValue::Int(1), CellValue::from("ada"), CellValue::Null],
                vec![CellValue::Int(22), CellValue::from("grace"), CellValue::from("admiral")],
            ],
        }
    }

    #[test]
    fn test_header_and_rows() {
        let grid = render_grid(&snapshot());
        let content: Vec<&str> = grid.lines().filter(|l| l.starts_with('|')).collect();

        // Header plus one line per row
        assert_eq!(content.len(), 3);
        for name in ["id", "name", "bio"] {
            assert!(content[0].contains(name));
        }
        assert!(content[1].contains("ada"));
        assert!(content[2].contains("admiral"));
    }

    #[test]
    fn test_grid_borders_every_row() {
        let grid = render_grid(&snapshot());
        let borders = grid.lines().filter(|l| l.starts_with('+')).count();
        assert_eq!(borders, 4);
    }

    #[test]
    fn test_numeric_detection_ignores_nulls() {
        let snap = snapshot();
        assert_eq!(numeric_columns(&snap), vec![0]);
    }

    #[test]
    fn test_numbers_are_right_aligned() {
        let grid = render_grid(&snapshot());
        let first_row = grid.lines().filter(|l| l.starts_with('|')).nth(1).unwrap();
        let id_cell = first_row.split('|').nth(1).unwrap();
        assert!(id_cell.ends_with("1 "));
        assert!(id_cell.starts_with("  "));
    }
}
