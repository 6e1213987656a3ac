//! Raw byte copying and file statistics.
//!
//! These work on bytes only; no decoding takes place.

use crate::config::ReaderConfig;
use crate::error::{BankIoError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// Outcome of a [`capture_stream`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureSummary {
    /// Non-empty reads performed.
    pub chunks: u64,
    /// Bytes copied.
    pub bytes: u64,
}

/// Line and byte counts of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStats {
    pub lines: u64,
    pub bytes: u64,
}

/// Calls `f` with the bytes of every read until the source is exhausted.
fn for_each_chunk<R, F>(source: &mut R, buf: &mut [u8], mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<()>,
{
    loop {
        let n = match source.read(buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        f(&buf[..n])?;
    }
}

/// Copies `source` into `sink` one chunk at a time.
///
/// Only the bytes produced by each read are written, and the sink is
/// flushed after every chunk so captured data survives an abrupt exit.
pub fn capture_stream<R, W>(
    mut source: R,
    mut sink: W,
    config: &ReaderConfig,
) -> Result<CaptureSummary>
where
    R: Read,
    W: Write,
{
    let mut buf = vec![0u8; config.chunk_size()];
    let mut summary = CaptureSummary::default();

    for_each_chunk(&mut source, &mut buf, |chunk| {
        sink.write_all(chunk)?;
        sink.flush()?;
        summary.chunks += 1;
        summary.bytes += chunk.len() as u64;
        debug!("Captured {} bytes", chunk.len());
        Ok(())
    })?;

    info!(
        "Capture finished: {} bytes in {} chunks",
        summary.bytes, summary.chunks
    );
    Ok(summary)
}

/// Counts the lines and bytes of a file.
///
/// A final line without a terminator counts as a line; a trailing newline
/// does not start a new one.
pub fn file_stats<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<FileStats> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| BankIoError::source_unavailable(path, e))?;

    let mut buf = vec![0u8; config.chunk_size()];
    let mut stats = FileStats::default();
    let mut last = None;

    for_each_chunk(&mut file, &mut buf, |chunk| {
        stats.bytes += chunk.len() as u64;
        stats.lines += chunk.iter().filter(|&&b| b == b'\n').count() as u64;
        last = chunk.last().copied();
        Ok(())
    })?;

    if matches!(last, Some(b) if b != b'\n') {
        stats.lines += 1;
    }
    Ok(stats)
}
