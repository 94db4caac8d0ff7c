//! Append-only JSON-lines journal.
//!
//! Each committed mutation is written as one JSON object followed by a newline and synced
//! before `save` returns. Loading reads the file top to bottom; a missing file is an empty
//! ledger.
//!
//! A record only counts once its newline is on disk. A failed append is truncated back
//! to the previous length, and an unterminated tail left by a crash is cut off when the
//! journal is opened or loaded, so the next append always starts on a fresh line.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use splitledger_core::ledger::{LedgerMutation, LedgerStore, StoreError};
use splitledger_shared::StoreConfig;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// File-backed journal store.
#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    // One append at a time so lines never interleave
    write_lock: Mutex<()>,
}

impl JournalStore {
    /// Opens the journal at `path`, creating parent directories as needed.
    ///
    /// The file itself is created on the first write. An existing file loses any
    /// unterminated final line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the parent directory cannot be created or the file
    /// cannot be repaired.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };
        store.read_committed().await?;
        info!(path = %store.path.display(), "journal store opened");
        Ok(store)
    }

    /// Opens the journal named by the store configuration.
    ///
    /// # Errors
    ///
    /// See [`JournalStore::open`].
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::open(&config.journal_path).await
    }

    /// Location of the journal file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every complete record, truncating the file after its last newline.
    ///
    /// `None` if the file does not exist yet.
    async fn read_committed(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let committed = committed_len(&bytes);
        if committed < bytes.len() {
            warn!(
                path = %self.path.display(),
                discarded_bytes = bytes.len() - committed,
                "dropping unterminated journal record"
            );
            let file = OpenOptions::new().write(true).open(&self.path).await?;
            file.set_len(committed as u64).await?;
            file.sync_data().await?;
            bytes.truncate(committed);
        }
        Ok(Some(bytes))
    }
}

/// Length of the journal up to and including its last newline.
fn committed_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map_or(0, |pos| pos + 1)
}

async fn write_synced(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_data().await
}

/// Decodes a journal body, reporting the 1-based line of the first bad record.
fn decode(contents: &str) -> Result<Vec<LedgerMutation>, StoreError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|err| StoreError::Corrupt {
                line: idx + 1,
                message: err.to_string(),
            })
        })
        .collect()
}

impl LedgerStore for JournalStore {
    async fn load(&self) -> Result<Vec<LedgerMutation>, StoreError> {
        let Some(bytes) = self.read_committed().await? else {
            debug!(path = %self.path.display(), "no journal yet");
            return Ok(Vec::new());
        };
        let contents =
            String::from_utf8(bytes).map_err(|err| io::Error::new(ErrorKind::InvalidData, err))?;

        let journal = decode(&contents)?;
        debug!(records = journal.len(), "journal decoded");
        Ok(journal)
    }

    async fn save(&self, mutation: &LedgerMutation) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(mutation)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let committed = file.metadata().await?.len();
        if let Err(err) = write_synced(&mut file, line.as_bytes()).await {
            warn!(kind = mutation.kind(), error = %err, "append failed, truncating");
            if let Err(rollback) = file.set_len(committed).await {
                warn!(error = %rollback, "could not truncate partial record");
            }
            return Err(err.into());
        }

        debug!(kind = mutation.kind(), "mutation appended");
        Ok(())
    }
}
