//! Export sinks: a structured JSON dump and a delimited table dump.

use crate::error::{QueryError, QueryResult};
use crate::result::RawResult;
use crate::table::NormalizedTable;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Fixed name of the tabular side output in the working directory.
pub const TABLE_FILE: &str = "out.csv";

/// Writes the raw result as pretty-printed JSON with a 4-space indent.
pub fn write_json<W: Write>(result: &RawResult, writer: W) -> QueryResult<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    result.to_json().serialize(&mut serializer)?;
    Ok(())
}

/// Dumps the raw result to `out`, or to stdout when no path is given.
pub fn dump_json(result: &RawResult, out: Option<&Path>) -> QueryResult<()> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|source| QueryError::resource_unavailable(path, source))?;
            let mut writer = BufWriter::new(file);
            write_json(result, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_json(result, &mut handle)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

/// Writes the table as comma-delimited rows, header first.
pub fn write_csv<W: Write>(table: &NormalizedTable, mut writer: W) -> QueryResult<()> {
    write_record(&mut writer, table.header.iter().map(|h| escape_cell(h)))?;
    for row in &table.rows {
        write_record(&mut writer, row.iter().map(|cell| escape_cell(&render_cell(cell))))?;
    }
    Ok(())
}

/// Dumps the table to `path`, replacing any previous contents.
pub fn dump_csv(table: &NormalizedTable, path: &Path) -> QueryResult<()> {
    let file =
        File::create(path).map_err(|source| QueryError::resource_unavailable(path, source))?;
    let mut writer = BufWriter::new(file);
    write_csv(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_record<W: Write>(
    writer: &mut W,
    cells: impl Iterator<Item = String>,
) -> QueryResult<()> {
    writeln!(writer, "{}", cells.collect::<Vec<_>>().join(","))?;
    Ok(())
}

/// Renders one cell. Strings appear bare, null is an empty cell, and
/// anything structured falls back to compact JSON.
fn render_cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Quotes a cell when it contains the delimiter, a quote, or a line
/// break; inner quotes are doubled.
fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
