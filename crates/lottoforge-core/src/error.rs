use thiserror::Error;

#[derive(Error, Debug)]
pub enum LottoError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Parse Error: {reason}")]
    Parse { reason: String },

    #[error("Shape Mismatch: expected {expected} main numbers, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("No data: {0}")]
    NotFound(String),
}

impl LottoError {
    pub fn parse(reason: impl Into<String>) -> Self {
        LottoError::Parse {
            reason: reason.into(),
        }
    }
}

pub type LottoResult<T> = Result<T, LottoError>;

/// A recoverable per-item problem (blob line, CSV row) reported next to the
/// items that did parse.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LineWarning {
    /// 1-based line (or CSV record) number.
    pub line: usize,
    pub text: String,
    pub reason: String,
}
