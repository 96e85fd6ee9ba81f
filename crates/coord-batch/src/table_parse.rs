use std::collections::HashMap;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::warn;

use crate::error::ParseError;
use crate::header::apply_header_mode;
use crate::model::ParsedTable;
use crate::options::{DataLimits, HeaderMode};
use crate::warning::{ParseWarning, WarningCode};

static CELL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t|,|\s+").expect("hardcoded cell separator regex is valid"));

pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    CELL_SEPARATOR
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn modal_width(rows: &[Vec<String>]) -> usize {
    let mut freq = HashMap::new();
    for width in rows.iter().map(Vec::len) {
        *freq.entry(width).or_insert(0_usize) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}

/// Splits pasted text into rows of non-empty cells. Blank lines are dropped.
pub fn parse_grid(raw: &str, limits: &DataLimits) -> Result<Vec<Vec<String>>, ParseError> {
    let mut rows = Vec::new();
    for line in raw.trim().lines() {
        let cells = split_line_into_cells(line);
        if cells.is_empty() {
            continue;
        }

        let row_number = rows.len() + 1;
        if cells.len() > limits.max_columns {
            return Err(ParseError::TooManyColumns {
                row: row_number,
                found: cells.len(),
                max: limits.max_columns,
            });
        }
        if let Some((index, cell)) = cells
            .iter()
            .enumerate()
            .find(|(_, cell)| cell.chars().count() > limits.max_cell_length)
        {
            return Err(ParseError::CellTooLong {
                row: row_number,
                column: index + 1,
                length: cell.chars().count(),
                max: limits.max_cell_length,
            });
        }

        rows.push(cells);
    }
    Ok(rows)
}

/// Parses pasted text and strips the header row according to `mode`.
pub fn parse_table(
    raw: &str,
    vocabulary: &[&str],
    mode: HeaderMode,
    limits: &DataLimits,
) -> Result<(ParsedTable, Vec<ParseWarning>), ParseError> {
    let mut warnings = Vec::new();
    let rows = parse_grid(raw, limits)?;
    let table = apply_header_mode(rows, mode, vocabulary, &mut warnings);

    if table.rows.len() > limits.max_rows {
        return Err(ParseError::TooManyRows {
            found: table.rows.len(),
            max: limits.max_rows,
        });
    }

    let modal = modal_width(&table.rows);
    if let Some(index) = table.rows.iter().position(|row| row.len() != modal) {
        warnings.push(
            ParseWarning::new(
                WarningCode::RaggedRows,
                format!("rows have differing column counts; most rows have {modal}"),
            )
            .with_row(index + 1),
        );
    }

    for warning in &warnings {
        warn!(code = ?warning.code, row = ?warning.row, "{}", warning.message);
    }

    Ok((table, warnings))
}

/// Decodes raw clipboard or file bytes, honouring a UTF-8/UTF-16 byte order mark.
#[must_use]
pub fn decode_input_bytes(bytes: &[u8]) -> String {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    decoded.into_owned()
}
