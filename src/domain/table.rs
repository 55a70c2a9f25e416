//! Table generation from flattened rows and a column selection

use tracing::{debug, instrument};

use crate::domain::columns::Column;
use crate::domain::entities::CellValue;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::flatten::FlatRow;

/// Rectangular export table: a heading row plus one row per row-tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Whether the first column holds row labels
    pub has_label_column: bool,
}

impl Table {
    /// Number of cells per row.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.width())
    }

    /// Keep only the rows whose switch is set; the header is always kept.
    pub fn retain_rows(&mut self, active: &[bool]) -> DomainResult<()> {
        if active.len() != self.rows.len() {
            return Err(DomainError::invalid_selection(
                "active_rows",
                format!(
                    "{} row switches for {} rows",
                    active.len(),
                    self.rows.len()
                ),
            ));
        }
        let mut switches = active.iter();
        self.rows.retain(|_| switches.next().copied().unwrap_or(false));
        Ok(())
    }

    /// All rows as strings, heading row first.
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(CellValue::to_string).collect()),
            )
            .collect()
    }
}

/// Generate the export table.
///
/// Output columns follow the order of `selected`. If every entry of
/// `label_column` is empty, no label column is generated; otherwise it must
/// have one entry per row.
#[instrument(level = "debug", skip_all, fields(rows = rows.len(), selected = selected.len()))]
pub fn generate_table(
    rows: &[FlatRow],
    columns: &[Column],
    selected: &[usize],
    label_column: &[String],
    label_column_heading: &str,
) -> DomainResult<Table> {
    if let Some(&index) = selected.iter().find(|&&i| i >= columns.len()) {
        return Err(DomainError::ColumnIndexOutOfRange {
            index,
            len: columns.len(),
        });
    }

    let has_label_column = label_column.iter().any(|label| !label.is_empty());
    if has_label_column && label_column.len() != rows.len() {
        return Err(DomainError::LabelCountMismatch {
            labels: label_column.len(),
            rows: rows.len(),
        });
    }

    let mut header = Vec::with_capacity(selected.len() + 1);
    if has_label_column {
        header.push(label_column_heading.to_string());
    }
    header.extend(selected.iter().map(|&i| columns[i].heading.clone()));

    let table_rows = rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let mut cells = Vec::with_capacity(header.len());
            if has_label_column {
                cells.push(CellValue::Text(label_column[row_index].clone()));
            }
            cells.extend(selected.iter().map(|&i| columns[i].get_value(row)));
            cells
        })
        .collect();

    let table = Table {
        header,
        rows: table_rows,
        has_label_column,
    };
    debug!(width = table.width(), "table generated");
    Ok(table)
}
