use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use super::{PersistenceError, RecordLog};
use crate::config::SyncPolicy;
use crate::models::StoredRecord;

/// The writable tail of a log: bytes go in through `AsyncWrite`, and a failed frame
/// can be cut off again with `truncate`.
#[async_trait]
pub trait LogFile: AsyncWrite + Unpin + Send + Sync {
    async fn size(&self) -> io::Result<u64>;
    async fn truncate(&self, len: u64) -> io::Result<()>;
    async fn sync(&self) -> io::Result<()>;
}

#[async_trait]
impl LogFile for File {
    async fn size(&self) -> io::Result<u64> {
        Ok(self.metadata().await?.len())
    }

    async fn truncate(&self, len: u64) -> io::Result<()> {
        self.set_len(len).await
    }

    async fn sync(&self) -> io::Result<()> {
        self.sync_data().await
    }
}

/// Newline-delimited JSON log, one record per line.
pub struct JsonlLog<F = File> {
    path: PathBuf,
    sync: SyncPolicy,
    // Held for the whole of one frame write.
    file: Mutex<F>,
}

impl JsonlLog<File> {
    /// Open (creating if needed) the log for appending. Missing parent directories
    /// are created.
    pub async fn open(path: impl Into<PathBuf>, sync: SyncPolicy) -> Result<Self, PersistenceError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistenceError::Open {
                    path: path.clone(),
                    source,
                })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| PersistenceError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::info!("Appending submissions to {} (sync={sync:?})", path.display());

        Ok(Self::from_file(path, file, sync))
    }
}

impl<F: LogFile> JsonlLog<F> {
    /// Wrap an already-open log file. `path` is only used in diagnostics.
    pub fn from_file(path: impl Into<PathBuf>, file: F, sync: SyncPolicy) -> Self {
        Self {
            path: path.into(),
            sync,
            file: Mutex::new(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<F: LogFile + 'static> RecordLog for JsonlLog<F> {
    async fn append(&self, record: &StoredRecord) -> Result<(), PersistenceError> {
        let mut frame = serde_json::to_vec(record)?;
        frame.push(b'\n');

        let mut file = self.file.lock().await;
        let start = file.size().await?;

        if let Err(e) = write_frame(&mut *file, &frame, self.sync).await {
            // Cut off whatever part of the frame reached the file.
            if let Err(truncate_err) = file.truncate(start).await {
                tracing::error!(
                    "Failed to roll back partial frame in {}: {truncate_err}",
                    self.path.display()
                );
            }
            return Err(PersistenceError::Write(e));
        }

        Ok(())
    }
}

async fn write_frame<F: LogFile>(file: &mut F, frame: &[u8], sync: SyncPolicy) -> io::Result<()> {
    file.write_all(frame).await?;
    file.flush().await?;
    if sync == SyncPolicy::Fsync {
        file.sync().await?;
    }
    Ok(())
}
