#![allow(dead_code)]

use std::path::Path;

/// Writes `text` as UTF-16LE with a byte order mark, the way spreadsheet
/// exports on Windows usually arrive.
pub fn write_utf16_fixture(path: &Path, text: &str) -> std::io::Result<()> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    std::fs::write(path, bytes)
}

pub fn parse_cell(line: &str, column: usize) -> f64 {
    line.split('\t')
        .nth(column)
        .and_then(|cell| cell.parse().ok())
        .unwrap_or(f64::NAN)
}
