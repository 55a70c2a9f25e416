//! CSV serialization of export tables

use std::io;

use csv::{QuoteStyle, WriterBuilder};
use tracing::debug;

use crate::domain::Table;
use crate::infrastructure::{InfraError, InfraResult};

/// Output options for CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote_all: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote_all: false,
        }
    }
}

impl CsvOptions {
    /// Options from a configured delimiter character, which must be ASCII.
    pub fn from_delimiter(delimiter: char, quote_all: bool) -> InfraResult<Self> {
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                InfraError::io(
                    "CSV delimiter",
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("delimiter must be a single ASCII character, got {delimiter:?}"),
                    ),
                )
            })?;
        Ok(Self {
            delimiter,
            quote_all,
        })
    }
}

/// Write `table` as UTF-8 CSV, heading row first.
pub fn write_table<W: io::Write>(table: &Table, writer: W, options: CsvOptions) -> InfraResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(if options.quote_all {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        })
        .from_writer(writer);

    csv_writer.write_record(&table.header)?;
    for row in &table.rows {
        csv_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| InfraError::io("flush CSV output", e))?;
    debug!(rows = table.row_count(), "CSV written");
    Ok(())
}

/// Render `table` as a CSV string.
pub fn table_to_csv(table: &Table, options: CsvOptions) -> InfraResult<String> {
    let mut buffer = Vec::new();
    write_table(table, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| {
        InfraError::io(
            "encode CSV output",
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })
}
