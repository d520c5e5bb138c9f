//! JSON-lines implementation of `LedgerStore`.
//!
//! One committed entry per line, in sequence order.  Lines are only ever
//! appended; the one exception is an unterminated final line left by a
//! crashed or failed write, which is cut off before the next append.
//!
//! Every handle takes an OS advisory lock on the ledger file: exclusive for
//! the refresh, tail check, write and `sync_data` of an append, shared for
//! reads.  Separate handles and separate processes therefore see appends
//! one at a time, and a writer whose `prev_hash` went stale gets
//! `ChainConflict` instead of forking the chain.
//!
//! Each handle caches the tail entry, the entry count, and the file size it
//! last saw.  A size change means another handle wrote, and the cache is
//! rebuilt from disk.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use fd_lock::RwLock;
use tracing::{debug, info, warn};

use ghms_contracts::{
    entry::{AuditEntry, PendingEntry, GENESIS_HASH},
    error::{AuditError, AuditResult},
};
use ghms_core::traits::LedgerStore;

#[derive(Default)]
struct Cache {
    tail: Option<AuditEntry>,
    len: u64,
    /// File size at the last scan or write.
    bytes: u64,
    /// Length of the newline-terminated prefix; less than `bytes` only when
    /// the file ends in a torn line.
    valid_bytes: u64,
}

struct FileState {
    file: RwLock<File>,
    cache: Cache,
}

/// An append-only ledger store backed by a JSON-lines file.
pub struct JsonlLedgerStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl JsonlLedgerStore {
    /// Open (or create) the ledger file at `path`.
    ///
    /// Missing parent directories are created and a torn final line is
    /// truncated.  Returns `AuditError::Corrupt` if a complete line cannot be
    /// decoded.
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error("create ledger directory", &path, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error("open ledger", &path, e))?;

        let mut file = RwLock::new(file);
        let mut cache = Cache::default();
        {
            let locked = file.write().map_err(|e| io_error("lock ledger", &path, e))?;
            refresh(&path, &mut cache)?;
            cut_torn_tail(&path, &locked, &mut cache)?;
        }

        info!(
            path = %path.display(),
            entries = cache.len,
            tail_sequence_id = cache.tail.as_ref().map(|t| t.sequence_id),
            "opened ledger file"
        );

        Ok(Self {
            path,
            state: Mutex::new(FileState { file, cache }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> AuditResult<MutexGuard<'_, FileState>> {
        self.state.lock().map_err(|e| AuditError::StoreUnavailable {
            reason: format!("ledger file lock poisoned: {}", e),
        })
    }

    /// Run `read` against a fresh cache under a shared file lock.
    fn with_shared<T>(&self, read: impl FnOnce(&Cache) -> T) -> AuditResult<T> {
        let mut state = self.lock()?;
        let FileState { file, cache } = &mut *state;
        let _shared = file
            .read()
            .map_err(|e| io_error("lock ledger", &self.path, e))?;
        refresh(&self.path, cache)?;
        Ok(read(cache))
    }

    /// Read every complete entry under a shared file lock.
    fn scan(&self) -> AuditResult<Vec<AuditEntry>> {
        let state = self.lock()?;
        let _shared = state
            .file
            .read()
            .map_err(|e| io_error("lock ledger", &self.path, e))?;
        Ok(read_entries(&self.path)?.entries)
    }
}

impl LedgerStore for JsonlLedgerStore {
    fn append_entry(&self, entry: PendingEntry) -> AuditResult<AuditEntry> {
        let mut state = self.lock()?;
        let FileState { file, cache } = &mut *state;
        let mut locked = file
            .write()
            .map_err(|e| io_error("lock ledger", &self.path, e))?;

        refresh(&self.path, cache)?;
        cut_torn_tail(&self.path, &locked, cache)?;

        let tail_hash = cache
            .tail
            .as_ref()
            .map(|t| t.curr_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        if entry.prev_hash != tail_hash {
            return Err(AuditError::ChainConflict {
                expected: entry.prev_hash,
                actual: tail_hash,
            });
        }

        let sequence_id = cache.tail.as_ref().map_or(1, |t| t.sequence_id + 1);
        let committed = AuditEntry::from_pending(sequence_id, entry);

        let mut line = serde_json::to_vec(&committed).map_err(|e| AuditError::Serialization {
            reason: format!("failed to encode ledger line: {}", e),
        })?;
        line.push(b'\n');

        if let Err(e) = write_line(&mut locked, &line) {
            // Leave no partial line behind for the next reader.
            if let Err(trunc) = locked.set_len(cache.bytes) {
                warn!(path = %self.path.display(), error = %trunc, "could not roll back partial ledger line");
            }
            return Err(io_error("append to ledger", &self.path, e));
        }

        cache.tail = Some(committed.clone());
        cache.len += 1;
        cache.bytes += line.len() as u64;
        cache.valid_bytes = cache.bytes;

        debug!(sequence_id, path = %self.path.display(), "entry committed to ledger file");
        Ok(committed)
    }

    fn last_entry(&self) -> AuditResult<Option<AuditEntry>> {
        self.with_shared(|cache| cache.tail.clone())
    }

    fn entries_in_range(&self, start_id: u64, end_id: u64) -> AuditResult<Vec<AuditEntry>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|e| (start_id..=end_id).contains(&e.sequence_id))
            .collect())
    }

    fn entry_before(&self, sequence_id: u64) -> AuditResult<Option<AuditEntry>> {
        Ok(self
            .scan()?
            .into_iter()
            .take_while(|e| e.sequence_id < sequence_id)
            .last())
    }

    fn len(&self) -> AuditResult<u64> {
        self.with_shared(|cache| cache.len)
    }
}

fn write_line(file: &mut File, line: &[u8]) -> io::Result<()> {
    file.write_all(line)?;
    file.sync_data()
}

/// Rebuild `cache` from disk if the file size moved since it was filled.
///
/// A cache that saw a torn tail is always rebuilt: once another handle cuts
/// the tail and appends, the size alone cannot tell the files apart.
fn refresh(path: &Path, cache: &mut Cache) -> AuditResult<()> {
    let bytes = file_size(path)?;
    if bytes == cache.bytes && cache.valid_bytes == cache.bytes {
        return Ok(());
    }
    debug!(path = %path.display(), "ledger file changed; rescanning");

    let scan = read_entries(path)?;
    cache.len = scan.entries.len() as u64;
    cache.tail = scan.entries.into_iter().last();
    cache.bytes = scan.total_bytes;
    cache.valid_bytes = scan.valid_bytes;
    Ok(())
}

/// Truncate an unterminated final line.  Callers hold the exclusive lock.
fn cut_torn_tail(path: &Path, file: &File, cache: &mut Cache) -> AuditResult<()> {
    if cache.valid_bytes >= cache.bytes {
        return Ok(());
    }
    warn!(
        path = %path.display(),
        torn_bytes = cache.bytes - cache.valid_bytes,
        "truncating torn final ledger line"
    );
    file.set_len(cache.valid_bytes)
        .and_then(|_| file.sync_data())
        .map_err(|e| io_error("truncate torn ledger line", path, e))?;
    cache.bytes = cache.valid_bytes;
    Ok(())
}

fn file_size(path: &Path) -> AuditResult<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| io_error("stat ledger", path, e))
}

struct Scan {
    entries: Vec<AuditEntry>,
    valid_bytes: u64,
    total_bytes: u64,
}

/// Decode every complete, non-blank line of the ledger file.
///
/// An unterminated final line is not decoded; it only shows up as the gap
/// between `valid_bytes` and `total_bytes`.
fn read_entries(path: &Path) -> AuditResult<Scan> {
    let file = File::open(path).map_err(|e| io_error("read ledger", path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut valid_bytes = 0u64;
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| io_error("read ledger", path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        if buf.last() != Some(&b'\n') {
            return Ok(Scan {
                entries,
                valid_bytes,
                total_bytes: valid_bytes + read as u64,
            });
        }
        valid_bytes += read as u64;

        let text = std::str::from_utf8(&buf).map_err(|e| AuditError::Corrupt {
            line: line_no,
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            continue;
        }
        let entry: AuditEntry = serde_json::from_str(text).map_err(|e| AuditError::Corrupt {
            line: line_no,
            reason: e.to_string(),
        })?;
        entries.push(entry);
    }

    Ok(Scan {
        entries,
        valid_bytes,
        total_bytes: valid_bytes,
    })
}

fn io_error(op: &str, path: &Path, e: io::Error) -> AuditError {
    AuditError::StoreUnavailable {
        reason: format!("failed to {} '{}': {}", op, path.display(), e),
    }
}
