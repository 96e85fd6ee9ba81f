use serde::{Deserialize, Serialize};

pub const TSV_CONTENT_TYPE: &str = "text/tab-separated-values; charset=utf-8";

/// Body accepted by `/api/v1/convert` and `/api/v1/clipboard`. Column
/// indices are zero-based, in role order (`lat,lng` or `x,y`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvertRequest {
    pub kind: String,
    pub raw: String,
    pub columns: (usize, usize),
    #[serde(default)]
    pub zone: Option<i64>,
    #[serde(default)]
    pub hemisphere: Option<String>,
    #[serde(default)]
    pub source_datum: Option<String>,
    #[serde(default)]
    pub target_datum: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub decimals: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowResponse {
    pub row: usize,
    pub original: Vec<String>,
    pub source: [f64; 2],
    pub converted: Option<[f64; 2]>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarningResponse {
    pub code: String,
    pub message: String,
    pub row: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertResponse {
    pub kind: String,
    pub header: Option<Vec<String>>,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub failed_rows: usize,
    pub rows: Vec<RowResponse>,
    pub warnings: Vec<WarningResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindDescriptor {
    pub kind: String,
    pub roles: Vec<String>,
    pub required_parameters: Vec<String>,
    pub clipboard_headers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindsResponse {
    pub items: Vec<KindDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
