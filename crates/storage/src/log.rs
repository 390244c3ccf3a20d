// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only log of client registrations
//!
//! One JSON object per line: `{"seq": n, "record": {...}}`. Every append is
//! synced before the registration is acknowledged. The log is replayed into
//! a [`ClientIndex`] when opened. An unparseable final line is a write torn
//! by a crash and is truncated away; a bad line anywhere else is corruption.

use crate::index::ClientIndex;
use async_trait::async_trait;
use mx_core::{ClientQuery, ClientRecord, IdentityStore, StoreError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur reading or writing the log
#[derive(Debug, Error)]
pub enum ClientLogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt entry at {path}:{line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

impl From<ClientLogError> for StoreError {
    fn from(err: ClientLogError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct LogEntry {
    seq: u64,
    record: ClientRecord,
}

/// Result of reading the log from disk
struct LogScan {
    records: Vec<ClientRecord>,
    /// Byte length of the intact prefix
    valid_len: u64,
    /// Line number of a torn final entry
    torn_line: Option<usize>,
    /// The last intact entry lacks its trailing newline
    missing_newline: bool,
}

struct LogState {
    file: File,
    sequence: u64,
    index: ClientIndex,
}

/// File-backed identity store
pub struct ClientLog {
    path: PathBuf,
    state: Mutex<LogState>,
}

impl ClientLog {
    /// Open or create the log at `path` and replay it
    pub fn open(path: &Path) -> Result<Self, ClientLogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let scan = Self::scan(path)?;
        let sequence = scan.records.len() as u64;

        let mut index = ClientIndex::default();
        for record in scan.records {
            let client = record.client_id.clone();
            if !index.apply(record) {
                warn!(client = %client, "ignoring duplicate registration in client log");
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if let Some(line) = scan.torn_line {
            warn!(
                path = %path.display(),
                line,
                "truncating torn entry at end of client log"
            );
            file.set_len(scan.valid_len)?;
        }
        if scan.missing_newline {
            file.write_all(b"\n")?;
        }
        if scan.torn_line.is_some() || scan.missing_newline {
            file.sync_all()?;
        }
        debug!(path = %path.display(), clients = index.len(), "opened client log");

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(LogState {
                file,
                sequence,
                index,
            }),
        })
    }

    /// Read every intact record in the log
    pub fn replay(path: &Path) -> Result<Vec<ClientRecord>, ClientLogError> {
        Ok(Self::scan(path)?.records)
    }

    fn scan(path: &Path) -> Result<LogScan, ClientLogError> {
        let mut scan = LogScan {
            records: Vec::new(),
            valid_len: 0,
            torn_line: None,
            missing_newline: false,
        };
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(scan),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        let mut offset = 0u64;
        let mut line_no = 0usize;
        // A bad line only counts as torn if nothing but blank lines follows
        let mut bad: Option<(usize, serde_json::Error)> = None;

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            line_no += 1;
            offset += read as u64;

            if line.iter().all(u8::is_ascii_whitespace) {
                if bad.is_none() {
                    scan.valid_len = offset;
                }
                continue;
            }
            if let Some((bad_line, source)) = bad.take() {
                return Err(ClientLogError::Corrupt {
                    path: path.to_path_buf(),
                    line: bad_line,
                    source,
                });
            }

            match serde_json::from_slice::<LogEntry>(&line) {
                Ok(entry) => {
                    scan.records.push(entry.record);
                    scan.valid_len = offset;
                    scan.missing_newline = line.last() != Some(&b'\n');
                }
                Err(source) => bad = Some((line_no, source)),
            }
        }

        scan.torn_line = bad.map(|(bad_line, _)| bad_line);
        Ok(scan)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries written so far
    pub fn sequence(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).sequence
    }

    /// Number of registered clients
    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogState {
    fn append(&mut self, record: &ClientRecord) -> Result<u64, ClientLogError> {
        let entry = LogEntry {
            seq: self.sequence + 1,
            record: record.clone(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        self.sequence = entry.seq;
        Ok(self.sequence)
    }
}

#[async_trait]
impl IdentityStore for ClientLog {
    async fn insert(&self, record: ClientRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.index.contains_email(&record.email) {
            return Err(StoreError::Duplicate(record.email));
        }

        state.append(&record)?;
        state.index.apply(record);
        Ok(())
    }

    async fn find(&self, query: &ClientQuery) -> Result<Option<ClientRecord>, StoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let found = match query {
            ClientQuery::ById(id) => state.index.by_id(id),
            ClientQuery::ByEmail(email) => state.index.by_email(email),
        };
        Ok(found.cloned())
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
