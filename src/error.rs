//! Error types for huff-codec

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error(
        "bad magic number {}, expected {:#010x}",
        .found.map_or_else(|| "(stream too short)".to_string(), |m| format!("{:#010x}", m)),
        .expected
    )]
    Format { found: Option<u32>, expected: u32 },

    #[error("malformed stream: {0}")]
    MalformedStream(String),

    #[error("input of {size} bytes exceeds configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for CompressError {
    fn from(e: serde_json::Error) -> Self {
        CompressError::Config(e.to_string())
    }
}
