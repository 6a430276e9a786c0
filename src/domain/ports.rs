use crate::domain::model::AccountRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Record store consumed by the import pipeline. `append_batch` must be
/// atomic: either every record in the slice is persisted or none is.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn append_batch(&self, records: Vec<AccountRecord>) -> Result<()>;
}

pub trait ImportConfig: Send + Sync {
    /// Maximum lines per batch (B).
    fn batch_size(&self) -> usize;
    /// Maximum batches in flight at once (C).
    fn max_in_flight(&self) -> usize;
}
