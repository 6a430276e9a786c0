use std::sync::Arc;

use tokio::io::AsyncBufRead;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::batcher::LineBatcher;
use crate::domain::model::{AccountRecord, BatchOutcome, ImportSummary};
use crate::domain::ports::{AccountStore, ImportConfig};
use crate::utils::error::{ImportError, Result};

/// Bulk importer: batches the feed, processes batches concurrently against
/// the store, and aggregates a single result.
///
/// Two knobs bound the work independently: `max_in_flight` caps how many
/// batches hold a dispatch permit at once, while the runtime's worker
/// threads cap raw execution parallelism.
pub struct Importer<S, C> {
    store: Arc<S>,
    config: C,
}

impl<S, C> Importer<S, C>
where
    S: AccountStore + 'static,
    C: ImportConfig,
{
    pub fn new(store: S, config: C) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Runs the import to completion. Does not return until every
    /// dispatched batch has reported an outcome.
    ///
    /// On success the summary carries the total committed record count. On
    /// failure the error carries the count of records committed by batches
    /// that succeeded; those commits are durable, there is no cross-batch
    /// rollback.
    pub async fn run<R>(&self, reader: R) -> Result<ImportSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let limiter = Arc::new(Semaphore::new(self.config.max_in_flight()));
        let mut batcher = LineBatcher::new(reader, self.config.batch_size());
        let mut workers: JoinSet<BatchOutcome> = JoinSet::new();

        let dispatch_result = self.dispatch_all(&mut batcher, &limiter, &mut workers).await;

        // Drain every spawned worker before surfacing any dispatch-side
        // error; no outcome may be dropped.
        let mut committed_records = 0usize;
        let mut committed_batches = 0usize;
        let mut first_failure: Option<ImportError> = None;
        while let Some(joined) = workers.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => BatchOutcome::Failed(ImportError::WorkerPanicked(e.to_string())),
            };
            match outcome {
                BatchOutcome::Committed(count) => {
                    committed_records += count;
                    committed_batches += 1;
                }
                BatchOutcome::Failed(cause) => {
                    // Only the first failure in completion order is
                    // surfaced; later causes were already logged by their
                    // workers.
                    if first_failure.is_none() {
                        first_failure = Some(cause);
                    }
                }
            }
        }

        let failure = dispatch_result.err().or(first_failure);
        match failure {
            None => {
                tracing::info!(
                    records = committed_records,
                    batches = committed_batches,
                    "import committed"
                );
                Ok(ImportSummary {
                    records_committed: committed_records,
                    batches_committed: committed_batches,
                })
            }
            Some(cause) => {
                tracing::error!(
                    records = committed_records,
                    "import failed: {cause}"
                );
                Err(ImportError::ImportFailed {
                    committed: committed_records,
                    source: Box::new(cause),
                })
            }
        }
    }

    async fn dispatch_all<R>(
        &self,
        batcher: &mut LineBatcher<R>,
        limiter: &Arc<Semaphore>,
        workers: &mut JoinSet<BatchOutcome>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut batch_id = 0usize;
        while let Some(batch) = batcher.next_batch().await? {
            let permit = limiter
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| ImportError::DispatchInterrupted)?;

            batch_id += 1;
            let store = Arc::clone(&self.store);
            workers.spawn(async move {
                // The permit moves into the task and is released on drop,
                // exactly once per batch, whatever the outcome.
                let _permit = permit;
                process_batch(store, batch_id, batch).await
            });
        }
        Ok(())
    }
}

/// Parses a batch's lines and persists them as one atomic unit. The first
/// malformed line fails the whole batch; nothing from a failed batch is
/// persisted.
async fn process_batch<S: AccountStore>(
    store: Arc<S>,
    batch_id: usize,
    lines: Vec<String>,
) -> BatchOutcome {
    tracing::info!(batch = batch_id, lines = lines.len(), "processing batch");

    let mut records = Vec::with_capacity(lines.len());
    for line in &lines {
        match AccountRecord::parse_line(line) {
            Ok(record) => records.push(record),
            Err(cause) => {
                tracing::error!(batch = batch_id, "batch rejected: {cause}");
                return BatchOutcome::Failed(cause);
            }
        }
    }

    let count = records.len();
    match store.append_batch(records).await {
        Ok(()) => {
            tracing::debug!(batch = batch_id, records = count, "batch committed");
            BatchOutcome::Committed(count)
        }
        Err(cause) => {
            tracing::error!(batch = batch_id, "batch persistence failed: {cause}");
            BatchOutcome::Failed(cause)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use tokio::io::BufReader;

    struct TestConfig {
        batch_size: usize,
        max_in_flight: usize,
    }

    impl ImportConfig for TestConfig {
        fn batch_size(&self) -> usize {
            self.batch_size
        }

        fn max_in_flight(&self) -> usize {
            self.max_in_flight
        }
    }

    fn feed(lines: &[&str]) -> String {
        let mut text = String::from("due_date,payment_date,amount,description,status\n");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn commits_single_short_batch() {
        let store = MemoryStore::new();
        let importer = Importer::new(
            store.clone(),
            TestConfig {
                batch_size: 5,
                max_in_flight: 10,
            },
        );

        let text = feed(&[
            "2024-01-10,,120.00,electricity,PENDING",
            "2024-01-11,2024-01-11,80.50,water,PAID",
            "2024-01-12,,45.00,internet,CANCELED",
        ]);
        let summary = importer.run(BufReader::new(text.as_bytes())).await.unwrap();

        assert_eq!(summary.records_committed, 3);
        assert_eq!(summary.batches_committed, 1);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn header_only_feed_commits_nothing() {
        let store = MemoryStore::new();
        let importer = Importer::new(
            store.clone(),
            TestConfig {
                batch_size: 5,
                max_in_flight: 10,
            },
        );

        let summary = importer
            .run(BufReader::new(feed(&[]).as_bytes()))
            .await
            .unwrap();

        assert_eq!(summary, ImportSummary::default());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn malformed_line_fails_whole_batch() {
        let store = MemoryStore::new();
        let importer = Importer::new(
            store.clone(),
            TestConfig {
                batch_size: 5,
                max_in_flight: 10,
            },
        );

        let text = feed(&["2024-01-10,,not-a-number,electricity,PENDING"]);
        let err = importer
            .run(BufReader::new(text.as_bytes()))
            .await
            .unwrap_err();

        match err {
            ImportError::ImportFailed { committed, source } => {
                assert_eq!(committed, 0);
                assert!(matches!(*source, ImportError::Parse { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.len().await, 0);
    }
}
