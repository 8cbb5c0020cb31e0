use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Malformed OCR input: {0}")]
    MalformedInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for OcrError {
    fn from(err: serde_json::Error) -> Self {
        OcrError::MalformedInput(err.to_string())
    }
}
