//! # bytebank-io
//!
//! Streams bank account records out of plain-text files.
//!
//! ## Design Principles
//!
//! - **Chunked reads**: bytes are pulled in fixed-size chunks (1024 by default)
//!   into a caller-owned buffer; only the bytes of each read are decoded
//! - **Streaming UTF-8**: multi-byte characters split across chunks are
//!   carried over, with a per-chunk lossy mode kept for fidelity
//! - **Fail fast**: a malformed line or invalid byte ends the read pass
//! - **Fixed-point balances**: two decimal places via `rust_decimal`
//!
//! ## Example
//!
//! ```
//! use bytebank_io::{Account, RecordReader, Result};
//! use std::io::Cursor;
//!
//! let data = "456,78945,4785.40,Gustavo Santos\n";
//! let accounts: Vec<Account> = RecordReader::new(Cursor::new(data))
//!     .collect::<Result<_>>()
//!     .unwrap();
//! assert_eq!(accounts[0].branch, 456);
//! assert_eq!(accounts[0].to_line(), "456,78945,4785.40,Gustavo Santos");
//! ```

pub mod account;
pub mod capture;
pub mod chunked;
pub mod config;
pub mod decimal;
pub mod error;
pub mod lines;
pub mod records;
pub mod writer;

pub use account::Account;
pub use capture::{capture_stream, file_stats, CaptureSummary, FileStats};
pub use chunked::{ChunkedReader, Chunks, Utf8Decoder};
pub use config::{DecodeMode, ReaderConfig};
pub use decimal::Balance;
pub use error::{BankIoError, Result};
pub use lines::Lines;
pub use records::RecordReader;
pub use writer::AccountWriter;
