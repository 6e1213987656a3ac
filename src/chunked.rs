//! Chunked byte reading with UTF-8 decoding.
//!
//! A [`ChunkedReader`] pulls at most one buffer's worth of bytes per read
//! call and decodes only the bytes that call produced. [`Chunks`] wraps it
//! in a lazy iterator that owns a fixed-size buffer.

use crate::config::{DecodeMode, ReaderConfig};
use crate::error::{BankIoError, Result};
use log::debug;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

/// Incremental UTF-8 decoder.
///
/// In [`DecodeMode::Streaming`] an incomplete multi-byte sequence at the end
/// of a chunk is held back and prefixed to the next chunk. In
/// [`DecodeMode::PerChunk`] every chunk is decoded on its own and lossily.
#[derive(Debug)]
pub struct Utf8Decoder {
    mode: DecodeMode,
    /// Trailing bytes of an incomplete sequence (at most 3).
    pending: Vec<u8>,
    /// Total bytes fed to the decoder so far.
    consumed: u64,
}

impl Utf8Decoder {
    pub fn new(mode: DecodeMode) -> Self {
        Utf8Decoder {
            mode,
            pending: Vec::with_capacity(4),
            consumed: 0,
        }
    }

    /// Decodes the next chunk of bytes.
    ///
    /// May return an empty string when every byte was held back as part of
    /// an incomplete sequence.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String> {
        match self.mode {
            DecodeMode::PerChunk => {
                self.consumed += bytes.len() as u64;
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
            DecodeMode::Streaming => self.decode_streaming(bytes),
        }
    }

    fn decode_streaming(&mut self, bytes: &[u8]) -> Result<String> {
        let base = self.consumed - self.pending.len() as u64;
        self.consumed += bytes.len() as u64;

        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let valid = match std::str::from_utf8(&data) {
            Ok(_) => data.len(),
            // Truncated sequence at the end: keep it for the next chunk.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(BankIoError::EncodingError {
                    offset: base + e.valid_up_to() as u64,
                })
            }
        };

        self.pending = data.split_off(valid);
        String::from_utf8(data).map_err(|e| BankIoError::EncodingError {
            offset: base + e.utf8_error().valid_up_to() as u64,
        })
    }

    /// Signals end of data. Fails if an incomplete sequence is still held.
    pub fn finish(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let offset = self.consumed - self.pending.len() as u64;
        self.pending.clear();
        Err(BankIoError::EncodingError { offset })
    }

    /// Total bytes fed to the decoder.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Init,
    Reading,
    Done,
}

/// Reads a byte source in chunks and decodes each chunk as UTF-8.
///
/// The source is owned for the lifetime of the reader and dropped with it,
/// so file handles are released on every exit path.
#[derive(Debug)]
pub struct ChunkedReader<R> {
    source: R,
    decoder: Utf8Decoder,
    chunk_size: usize,
    chunks_read: u64,
    state: ReadState,
}

impl<R: Read> ChunkedReader<R> {
    /// Creates a reader with the default configuration (1024-byte chunks,
    /// streaming decode).
    pub fn new(source: R) -> Self {
        Self::with_config(source, &ReaderConfig::default())
    }

    /// Creates a reader using the given configuration.
    pub fn with_config(source: R, config: &ReaderConfig) -> Self {
        ChunkedReader {
            source,
            decoder: Utf8Decoder::new(config.decode_mode()),
            chunk_size: config.chunk_size(),
            chunks_read: 0,
            state: ReadState::Init,
        }
    }

    /// Reads the next chunk into `buf` and returns its decoded text.
    ///
    /// Only `buf[..n]` is decoded, where `n` is the byte count of this read.
    /// Returns `Ok(None)` once the source reports end of data. After the
    /// first error or end of data the source is not read again.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<Option<String>> {
        if buf.is_empty() {
            return Err(BankIoError::InvalidConfig(
                "chunk buffer must not be empty".to_string(),
            ));
        }

        loop {
            if self.state == ReadState::Done {
                return Ok(None);
            }

            let n = match self.fill(buf) {
                Ok(n) => n,
                Err(e) => {
                    self.state = ReadState::Done;
                    return Err(e.into());
                }
            };

            if n == 0 {
                self.state = ReadState::Done;
                debug!(
                    "End of data after {} chunks ({} bytes)",
                    self.chunks_read,
                    self.decoder.consumed()
                );
                self.decoder.finish()?;
                return Ok(None);
            }

            self.state = ReadState::Reading;
            self.chunks_read += 1;
            debug!("Chunk {}: {} bytes", self.chunks_read, n);

            let text = match self.decoder.decode(&buf[..n]) {
                Ok(text) => text,
                Err(e) => {
                    self.state = ReadState::Done;
                    return Err(e);
                }
            };

            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }

    /// Performs one read call, retrying on interruption.
    fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            match self.source.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    /// Converts the reader into a lazy iterator of decoded fragments that
    /// owns a buffer of the configured chunk size.
    pub fn chunks(self) -> Chunks<R> {
        let buffer = vec![0u8; self.chunk_size];
        Chunks {
            reader: self,
            buffer,
        }
    }

    /// Number of non-empty reads performed so far.
    pub fn chunks_read(&self) -> u64 {
        self.chunks_read
    }

    /// Total bytes read from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.decoder.consumed()
    }

    /// Returns `true` once end of data or an error was reached.
    pub fn is_done(&self) -> bool {
        self.state == ReadState::Done
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Lazy, finite iterator over decoded chunks.
///
/// Consumes its source; it cannot be restarted.
#[derive(Debug)]
pub struct Chunks<R> {
    reader: ChunkedReader<R>,
    buffer: Vec<u8>,
}

impl<R: Read> Chunks<R> {
    /// Returns the underlying chunked reader.
    pub fn into_inner(self) -> ChunkedReader<R> {
        self.reader
    }
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_chunk(&mut self.buffer).transpose()
    }
}

impl<R: Read> FusedIterator for Chunks<R> {}
