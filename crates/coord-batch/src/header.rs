use crate::model::ParsedTable;
use crate::options::HeaderMode;
use crate::warning::{ParseWarning, WarningCode};

fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// True when any cell contains one of the vocabulary words, ignoring case.
#[must_use]
pub fn looks_like_header(row: &[String], vocabulary: &[&str]) -> bool {
    row.iter().any(|cell| {
        let lowered = cell.trim().to_lowercase();
        vocabulary.iter().any(|word| lowered.contains(word))
    })
}

pub(crate) fn apply_header_mode(
    mut rows: Vec<Vec<String>>,
    mode: HeaderMode,
    vocabulary: &[&str],
    warnings: &mut Vec<ParseWarning>,
) -> ParsedTable {
    if rows.is_empty() {
        return ParsedTable::default();
    }

    let strip = match mode {
        HeaderMode::HasHeader => true,
        HeaderMode::NoHeader => false,
        HeaderMode::AutoDetect => {
            let matched = looks_like_header(&rows[0], vocabulary);
            if !matched && !rows[0].iter().any(|cell| is_numeric(cell)) {
                warnings.push(
                    ParseWarning::new(
                        WarningCode::HeaderNotRecognized,
                        "first row has no numeric cells but matched no header keyword; keeping it as data",
                    )
                    .with_row(1),
                );
            }
            matched
        }
    };

    if strip {
        let header = rows.remove(0);
        ParsedTable {
            header: Some(header),
            rows,
        }
    } else {
        ParsedTable { header: None, rows }
    }
}
