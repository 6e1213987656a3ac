//! Re-serializes accounts in the record format.

use crate::account::Account;
use crate::error::{BankIoError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes accounts as `branch,number,balance,holder` lines, UTF-8 encoded.
///
/// Fields are never quoted, so every line written can be read back by
/// [`RecordReader`](crate::records::RecordReader). Holders that would break
/// the format are rejected before anything is written.
#[derive(Debug)]
pub struct AccountWriter<W: Write> {
    csv: csv::Writer<W>,
    flush_each_record: bool,
    written: usize,
}

impl AccountWriter<File> {
    /// Creates (or truncates) a record file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| BankIoError::source_unavailable(path, e))?;
        debug!("Created {} for writing", path.display());
        Ok(Self::new(file))
    }
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        let csv = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);

        AccountWriter {
            csv,
            flush_each_record: false,
            written: 0,
        }
    }

    /// Flushes the sink after every record instead of only on `finish`.
    pub fn flush_each_record(mut self, enabled: bool) -> Self {
        self.flush_each_record = enabled;
        self
    }

    /// Writes one account.
    pub fn write(&mut self, account: &Account) -> Result<()> {
        if !account.is_serializable() {
            return Err(BankIoError::malformed(
                self.written + 1,
                format!(
                    "holder '{}' contains a delimiter or line break",
                    account.holder.escape_debug()
                ),
            ));
        }

        self.csv.serialize(account)?;
        self.written += 1;

        if self.flush_each_record {
            self.csv.flush()?;
            debug!("Flushed record {}", self.written);
        }
        Ok(())
    }

    /// Parses a pre-formatted line and writes it in normalized form.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let account = Account::parse_numbered(line, self.written + 1)?;
        self.write(&account)
    }

    /// Writes every account from an iterator, stopping at the first error.
    pub fn write_all<'a, I>(&mut self, accounts: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Account>,
    {
        let before = self.written;
        for account in accounts {
            self.write(account)?;
        }
        Ok(self.written - before)
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes buffered output and returns the sink.
    pub fn finish(self) -> Result<W> {
        debug!("Finished writing {} records", self.written);
        self.csv
            .into_inner()
            .map_err(|e| BankIoError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Balance;
    use std::io;
    use std::str::FromStr;

    fn account(holder: &str) -> Account {
        Account::new(456, 78945, Balance::from_str("4785.4").unwrap(), holder)
    }

    /// Sink counting flush calls.
    #[derive(Default)]
    struct CountingSink {
        data: Vec<u8>,
        flushes: usize,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_writes_record_format() {
        let mut writer = AccountWriter::new(Vec::new());
        writer.write(&account("Gustavo Santos")).unwrap();
        writer.write_line("456,65465,456.0,Pedro").unwrap();
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            output,
            "456,78945,4785.40,Gustavo Santos\n456,65465,456.00,Pedro\n"
        );
    }

    #[test]
    fn test_non_ascii_holder_is_utf8() {
        let mut writer = AccountWriter::new(Vec::new());
        writer.write(&account("Estêvão")).unwrap();
        let output = writer.finish().unwrap();
        assert_eq!(output, "456,78945,4785.40,Estêvão\n".as_bytes());
    }

    #[test]
    fn test_rejects_holder_with_delimiter() {
        let mut writer = AccountWriter::new(Vec::new());
        let err = writer.write(&account("Santos, Gustavo")).unwrap_err();
        assert!(matches!(err, BankIoError::MalformedRecord { .. }));
        assert_eq!(writer.written(), 0);
        assert!(writer.finish().unwrap().is_empty());
    }

    #[test]
    fn test_write_line_rejects_malformed() {
        let mut writer = AccountWriter::new(Vec::new());
        assert!(writer.write_line("a,b,c").is_err());
    }

    #[test]
    fn test_flush_each_record() {
        let mut writer = AccountWriter::new(CountingSink::default()).flush_each_record(true);
        let accounts = vec![account("Ana"), account("Bia"), account("Caio")];
        assert_eq!(writer.write_all(&accounts).unwrap(), 3);
        let sink = writer.finish().unwrap();
        assert!(sink.flushes >= 3);
        assert_eq!(String::from_utf8(sink.data).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_no_flush_per_record_by_default() {
        let mut writer = AccountWriter::new(CountingSink::default());
        writer.write(&account("Ana")).unwrap();
        writer.write(&account("Bia")).unwrap();
        let sink = writer.finish().unwrap();
        assert_eq!(sink.flushes, 1);
    }
}
