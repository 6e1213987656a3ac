//! Reader configuration.
//!
//! Defaults can be overridden through environment variables:
//!
//! - `BYTEBANK_CHUNK_SIZE`: bytes pulled per read call (default 1024)
//! - `BYTEBANK_DECODE`: `streaming` (default) or `per-chunk`

use crate::error::{BankIoError, Result};
use log::debug;
use std::env;
use std::str::FromStr;

/// Default number of bytes pulled from the source per read call.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Environment variable overriding the chunk size.
pub const CHUNK_SIZE_VAR: &str = "BYTEBANK_CHUNK_SIZE";

/// Environment variable selecting the decode mode.
pub const DECODE_MODE_VAR: &str = "BYTEBANK_DECODE";

/// How chunks are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Carry incomplete multi-byte sequences over to the next chunk.
    /// Invalid bytes are an error.
    #[default]
    Streaming,

    /// Decode every chunk on its own, replacing invalid or split sequences
    /// with U+FFFD. Never fails.
    PerChunk,
}

impl FromStr for DecodeMode {
    type Err = BankIoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "streaming" => Ok(DecodeMode::Streaming),
            "per-chunk" | "per_chunk" | "perchunk" => Ok(DecodeMode::PerChunk),
            other => Err(BankIoError::InvalidConfig(format!(
                "unknown decode mode '{}'",
                other
            ))),
        }
    }
}

/// Settings shared by the chunked reader, the record reader and capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    chunk_size: usize,
    decode_mode: DecodeMode,
}

impl ReaderConfig {
    /// Creates a configuration with the given chunk size.
    ///
    /// Returns `InvalidConfig` if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self> {
        Self::default().with_chunk_size(chunk_size)
    }

    /// Reads overrides from the environment on top of the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(CHUNK_SIZE_VAR) {
            let size = raw.trim().parse::<usize>().map_err(|e| {
                BankIoError::InvalidConfig(format!("{}='{}': {}", CHUNK_SIZE_VAR, raw, e))
            })?;
            config = config.with_chunk_size(size)?;
        }
        if let Ok(raw) = env::var(DECODE_MODE_VAR) {
            config = config.with_decode_mode(raw.parse()?);
        }

        debug!("Reader configuration: {:?}", config);
        Ok(config)
    }

    /// Sets the chunk size. Zero is rejected.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(BankIoError::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    /// Sets the decode mode.
    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.decode_mode
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            decode_mode: DecodeMode::default(),
        }
    }
}
