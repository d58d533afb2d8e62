//! Configuration for huff-codec

use crate::error::CompressError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Upper bound for inputs handed to `Compressor::compress_bytes`.
    pub max_input_size: usize,
    /// Accept streams stamped with the older tree-header magic.
    pub accept_legacy_magic: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            accept_legacy_magic: true,
        }
    }
}

impl CodecConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CompressError> {
        Ok(serde_json::from_str(json)?)
    }
}
