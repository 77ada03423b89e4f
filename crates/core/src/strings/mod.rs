//! Printable-string extraction from arbitrary binary files.
//!
//! This is an in-process equivalent of the `strings` utility: it emits every
//! maximal run of printable-ASCII bytes (`[32, 126]`) that is at least a
//! minimum length, in file order, without deduplication. No object-format
//! parsing happens here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{is_printable, BinaryString};

const READ_CHUNK_SIZE: usize = 8192;

/// Error type for string extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not open binary file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read binary file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accumulates printable runs across arbitrarily split input.
#[derive(Debug)]
struct RunCollector {
    min_length: usize,
    offset: u64,
    run_start: u64,
    current: Vec<u8>,
    strings: Vec<BinaryString>,
}

impl RunCollector {
    fn new(min_length: usize) -> Self {
        Self {
            // An empty run is never a string.
            min_length: min_length.max(1),
            offset: 0,
            run_start: 0,
            current: Vec::new(),
            strings: Vec::new(),
        }
    }

    fn feed(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if is_printable(byte) {
                if self.current.is_empty() {
                    self.run_start = self.offset;
                }
                self.current.push(byte);
            } else {
                self.close_run();
            }
            self.offset += 1;
        }
    }

    fn close_run(&mut self) {
        if self.current.len() >= self.min_length {
            // Every byte is in [32, 126], so this is plain ASCII.
            let value: String = self.current.iter().map(|&b| char::from(b)).collect();
            self.strings.push(BinaryString::new(self.run_start, value));
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<BinaryString> {
        self.close_run();
        self.strings
    }
}

/// Extract printable runs from an in-memory buffer.
pub fn extract_from_bytes(data: &[u8], min_length: usize) -> Vec<BinaryString> {
    let mut collector = RunCollector::new(min_length);
    collector.feed(data);
    collector.finish()
}

/// Extract printable runs from any reader, consuming it in fixed-size chunks.
pub fn extract_from_reader<R: Read>(
    reader: R,
    min_length: usize,
) -> Result<Vec<BinaryString>, ExtractError> {
    let mut reader = BufReader::new(reader);
    let mut collector = RunCollector::new(min_length);
    let mut buf = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ExtractError::Io(e)),
        };
        collector.feed(&buf[..n]);
    }

    Ok(collector.finish())
}

/// Extract printable runs from the file at `path`.
pub fn extract_strings(
    path: impl AsRef<Path>,
    min_length: usize,
) -> Result<Vec<BinaryString>, ExtractError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|source| ExtractError::Open { path: path.to_path_buf(), source })?;

    let strings = extract_from_reader(file, min_length).map_err(|err| match err {
        ExtractError::Io(source) => ExtractError::Read { path: path.to_path_buf(), source },
        other => other,
    })?;

    log::debug!("extracted {} strings from {}", strings.len(), path.display());
    Ok(strings)
}
