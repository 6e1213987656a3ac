//! Streaming account reader.
//!
//! Stacks [`Chunks`](crate::chunked::Chunks) and [`Lines`] and parses
//! every line into an [`Account`]. Records are produced one at a time; the
//! reader keeps no record after handing it out.

use crate::account::Account;
use crate::chunked::{ChunkedReader, Chunks};
use crate::config::ReaderConfig;
use crate::error::{BankIoError, Result};
use crate::lines::Lines;
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;

/// Byte-order mark some editors put at the start of UTF-8 files.
const BOM: char = '\u{FEFF}';

/// Iterator of accounts read from a byte source.
///
/// The first error (I/O, encoding or malformed record) is yielded and then
/// iteration stops. There is no partial-record recovery.
#[derive(Debug)]
pub struct RecordReader<R> {
    lines: Lines<Chunks<R>>,
    line_no: usize,
    failed: bool,
}

impl RecordReader<File> {
    /// Opens a record file.
    ///
    /// A missing or inaccessible file is reported as `SourceUnavailable`.
    pub fn open<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BankIoError::source_unavailable(path, e))?;
        debug!("Opened {} for reading", path.display());
        Ok(Self::with_config(file, config))
    }
}

impl<R: Read> RecordReader<R> {
    /// Creates a reader with the default configuration.
    pub fn new(source: R) -> Self {
        Self::with_config(source, &ReaderConfig::default())
    }

    /// Creates a reader using the given configuration.
    pub fn with_config(source: R, config: &ReaderConfig) -> Self {
        let chunks = ChunkedReader::with_config(source, config).chunks();
        RecordReader {
            lines: Lines::new(chunks),
            line_no: 0,
            failed: false,
        }
    }

    /// Number of lines consumed so far (1-based number of the last line).
    pub fn line_number(&self) -> usize {
        self.line_no
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Account>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.lines.next()? {
            Ok(line) => {
                self.line_no += 1;
                let text = if self.line_no == 1 {
                    line.strip_prefix(BOM).unwrap_or(line.as_str())
                } else {
                    line.as_str()
                };
                Account::parse_numbered(text, self.line_no)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("Aborting read pass after line {}: {}", self.line_no, e);
            self.failed = true;
        }
        Some(result)
    }
}

impl<R: Read> FusedIterator for RecordReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeMode;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    fn read_all(input: &str, chunk_size: usize) -> Vec<Result<Account>> {
        let config = ReaderConfig::new(chunk_size).unwrap();
        RecordReader::with_config(Cursor::new(input.as_bytes().to_vec()), &config).collect()
    }

    #[test]
    fn test_reads_accounts_across_small_chunks() {
        let input = "456,78945,4785.40,Gustavo Santos\n123,4567,10.00,João Conceição\n";
        for size in [1, 3, 7, 1024] {
            let accounts: Vec<Account> = read_all(input, size)
                .into_iter()
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(accounts.len(), 2, "chunk size {}", size);
            assert_eq!(accounts[0].holder, "Gustavo Santos");
            assert_eq!(accounts[1].holder, "João Conceição");
            assert_eq!(accounts[1].balance.to_string(), "10.00");
        }
    }

    #[test]
    fn test_empty_source_yields_no_records() {
        assert!(read_all("", 4).is_empty());
    }

    #[test]
    fn test_malformed_line_aborts_with_line_number() {
        let results = read_all("1,2,3.00,Ana\na,b,c\n4,5,6.00,Bia\n", 1024);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(BankIoError::MalformedRecord { line, .. }) => assert_eq!(*line, 2),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_encoding_error_is_surfaced() {
        let mut bytes = b"1,2,3.00,Ana\n4,5,6.00,".to_vec();
        bytes.push(0xff);
        let results: Vec<_> = RecordReader::new(Cursor::new(bytes)).collect();
        assert!(matches!(
            results.last(),
            Some(Err(BankIoError::EncodingError { .. }))
        ));
    }

    #[test]
    fn test_per_chunk_mode_corrupts_split_name() {
        let config = ReaderConfig::new(2)
            .unwrap()
            .with_decode_mode(DecodeMode::PerChunk);
        // 'é' occupies bytes 7..9 and straddles the chunk boundary at 8.
        let input = "1,2,3, é".as_bytes().to_vec();
        let account = RecordReader::with_config(Cursor::new(input), &config)
            .next()
            .unwrap()
            .unwrap();
        assert_ne!(account.holder, "é");
        assert!(account.holder.contains('\u{FFFD}'));
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let input = "\u{FEFF}456,78945,4785.40,Gustavo Santos\n1,2,3.00,Ana\n";
        for size in [1, 2, 1024] {
            let accounts: Vec<Account> = read_all(input, size)
                .into_iter()
                .collect::<Result<_>>()
                .unwrap();
            assert_eq!(accounts.len(), 2, "chunk size {}", size);
            assert_eq!(accounts[0].branch, 456);
        }
    }

    #[test]
    fn test_bom_after_first_line_is_malformed() {
        let results = read_all("1,2,3.00,Ana\n\u{FEFF}4,5,6.00,Bia\n", 1024);
        assert!(matches!(
            results.last(),
            Some(Err(BankIoError::MalformedRecord { line: 2, .. }))
        ));
    }

    /// Source that records when it is dropped.
    struct DropFlag {
        data: Cursor<Vec<u8>>,
        dropped: Rc<Cell<bool>>,
    }

    impl Read for DropFlag {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[test]
    fn test_source_released_after_malformed_record() {
        let dropped = Rc::new(Cell::new(false));
        let source = DropFlag {
            data: Cursor::new(b"1,2,3.00,Ana\na,b,c\n4,5,6.00,Bia\n".to_vec()),
            dropped: Rc::clone(&dropped),
        };

        let mut reader = RecordReader::with_config(source, &ReaderConfig::new(4).unwrap());
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(BankIoError::MalformedRecord { line: 2, .. }))
        ));
        assert!(!dropped.get());

        drop(reader);
        assert!(dropped.get());
    }

    #[test]
    fn test_open_missing_file() {
        let err = RecordReader::open("definitely/not/here.txt", &ReaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, BankIoError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_line_number_tracks_progress() {
        let mut reader = RecordReader::new(Cursor::new(b"1,1,1,A\n2,2,2,B".to_vec()));
        reader.next();
        assert_eq!(reader.line_number(), 1);
        reader.next();
        assert_eq!(reader.line_number(), 2);
        assert!(reader.next().is_none());
    }
}
