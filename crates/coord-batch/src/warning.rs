#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    HeaderNotRecognized,
    RaggedRows,
}

impl WarningCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeaderNotRecognized => "header_not_recognized",
            Self::RaggedRows => "ragged_rows",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub code: WarningCode,
    pub message: String,
    pub row: Option<usize>,
}

impl ParseWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            row: None,
        }
    }

    /// One-based row number, as shown to the user.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}
