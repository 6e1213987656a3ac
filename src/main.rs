//! bytebank-io CLI
//!
//! Thin harness over the library.
//!
//! # Usage
//!
//! ```bash
//! bytebank-io dump accounts.txt          # print decoded chunks verbatim
//! bytebank-io accounts accounts.txt      # print one summary per account
//! bytebank-io export out.csv < in.txt    # re-serialize accounts from stdin
//! bytebank-io capture stdin.txt          # copy stdin to a file chunk by chunk
//! bytebank-io stats accounts.txt         # line and byte counts
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `BYTEBANK_CHUNK_SIZE`: bytes per read call (default 1024)
//! - `BYTEBANK_DECODE`: `streaming` (default) or `per-chunk`

use bytebank_io::{
    capture_stream, file_stats, Account, AccountWriter, Balance, BankIoError, ChunkedReader,
    ReaderConfig, RecordReader, Result,
};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(BankIoError::MissingArgument);
    }

    let command = args[1].as_str();
    let path = &args[2];
    let config = ReaderConfig::from_env()?;

    match command {
        "dump" => dump(path, &config),
        "accounts" => print_accounts(path, &config),
        "export" => export(path, &config),
        "capture" => capture(path, &config),
        "stats" => {
            let stats = file_stats(path, &config)?;
            println!("{}: {} lines, {} bytes", path, stats.lines, stats.bytes);
            Ok(())
        }
        other => Err(BankIoError::UnknownCommand(other.to_string())),
    }
}

fn open_source(path: &str) -> Result<File> {
    File::open(path).map_err(|e| BankIoError::source_unavailable(path, e))
}

fn dump(path: &str, config: &ReaderConfig) -> Result<()> {
    let reader = ChunkedReader::with_config(open_source(path)?, config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for chunk in reader.chunks() {
        out.write_all(chunk?.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn print_accounts(path: &str, config: &ReaderConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    let mut total = Balance::ZERO;

    for account in RecordReader::open(path, config)? {
        let account = account?;
        writeln!(out, "{}", account)?;
        count += 1;
        total += account.balance;
    }
    out.flush()?;

    info!("{} accounts, total balance {}", count, total);
    Ok(())
}

fn export(path: &str, config: &ReaderConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut writer = AccountWriter::create(path)?;

    for account in RecordReader::with_config(stdin.lock(), config) {
        let account: Account = account?;
        writer.write(&account)?;
    }

    let written = writer.written();
    writer.finish()?;
    info!("Exported {} accounts to {}", written, path);
    Ok(())
}

fn capture(path: &str, config: &ReaderConfig) -> Result<()> {
    let sink = File::create(path).map_err(|e| BankIoError::source_unavailable(path, e))?;
    let stdin = io::stdin();
    let summary = capture_stream(stdin.lock(), sink, config)?;
    eprintln!("Captured {} bytes from standard input", summary.bytes);
    Ok(())
}
