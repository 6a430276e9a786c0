use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::model::AccountRecord;
use crate::domain::ports::AccountStore;
use crate::utils::error::{ImportError, Result};

/// In-memory store. Appends are atomic under the lock; there is no
/// deduplication, so importing the same feed twice duplicates every record.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    records: Vec<AccountRecord>,
    appends_remaining: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that accepts `successes` batch appends and rejects every one
    /// after that. Used to exercise persistence failures.
    pub fn failing_after(successes: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                records: Vec::new(),
                appends_remaining: Some(successes),
            })),
        }
    }

    pub async fn records(&self) -> Vec<AccountRecord> {
        self.inner.lock().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn append_batch(&self, records: Vec<AccountRecord>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if let Some(remaining) = inner.appends_remaining.as_mut() {
            if *remaining == 0 {
                return Err(ImportError::Persistence(
                    "store rejected batch append".to_string(),
                ));
            }
            *remaining -= 1;
        }
        inner.records.extend(records);
        Ok(())
    }
}
