use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::model::AccountRecord;
use crate::domain::ports::AccountStore;
use crate::utils::error::{ImportError, Result};

/// Appends records as JSON lines to a single file. A batch is serialized to
/// a buffer first and written under the lock in one call, so a batch is
/// either fully appended or not at all (single-process guarantee only).
#[derive(Clone)]
pub struct JsonlStore {
    file: Arc<Mutex<File>>,
}

impl JsonlStore {
    /// Opens `path` in append mode, creating the file and any missing
    /// parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

#[async_trait]
impl AccountStore for JsonlStore {
    async fn append_batch(&self, records: Vec<AccountRecord>) -> Result<()> {
        let mut buf = Vec::new();
        for record in &records {
            serde_json::to_writer(&mut buf, record)?;
            buf.push(b'\n');
        }

        let mut file = self.file.lock().await;
        file.write_all(&buf)
            .await
            .map_err(|e| ImportError::Persistence(format!("jsonl append: {e}")))?;
        file.flush()
            .await
            .map_err(|e| ImportError::Persistence(format!("jsonl flush: {e}")))?;
        Ok(())
    }
}
