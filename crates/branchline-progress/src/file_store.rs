//! File-backed implementation of the `ProgressStore` trait.
//!
//! The file is a flat JSON object of string keys to string values, so the
//! progress record sits beside any other device-local settings:
//!
//! ```json
//! { "currentSceneIndex": "2" }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use branchline_core::error::StorageError;
use branchline_core::progress::{PROGRESS_KEY, ProgressStore, decode_index, encode_index};

type Records = BTreeMap<String, String>;

/// Progress store persisted to a single JSON file.
///
/// Writes go to a sibling temporary file that is synced and then renamed over
/// the target, so a crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn load_records(&self) -> Result<Records, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StorageError::Corrupt(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Records::new()),
            Err(e) => Err(StorageError::Io(format!("{}: {e}", self.path.display()))),
        }
    }

    async fn store_records(&self, records: &Records) -> Result<(), StorageError> {
        let io_err = |e: std::io::Error| StorageError::Io(format!("{}: {e}", self.path.display()));

        let content = serde_json::to_vec_pretty(records)
            .map_err(|e| StorageError::Io(format!("encoding progress record: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await.map_err(io_err)?;
        file.write_all(&content).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        fs::rename(&temp_path, &self.path).await.map_err(io_err)
    }
}

#[async_trait]
impl ProgressStore for FileProgressStore {
    async fn read(&self) -> Result<Option<usize>, StorageError> {
        let records = self.load_records().await?;
        records.get(PROGRESS_KEY).map(|raw| decode_index(raw)).transpose()
    }

    async fn write(&self, index: usize) -> Result<(), StorageError> {
        let mut records = match self.load_records().await {
            Ok(records) => records,
            Err(StorageError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "replacing corrupt progress file");
                Records::new()
            }
            Err(e) => return Err(e),
        };
        records.insert(PROGRESS_KEY.to_owned(), encode_index(index));
        self.store_records(&records).await?;
        debug!(path = %self.path.display(), scene_index = index, "progress persisted");
        Ok(())
    }
}
