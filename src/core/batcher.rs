use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::utils::error::Result;

/// Reads a delimited feed line by line and groups data lines into batches
/// of at most `batch_size`. The first line of the stream is a header and is
/// always discarded.
pub struct LineBatcher<R> {
    lines: Lines<R>,
    batch_size: usize,
    header_skipped: bool,
}

impl<R: AsyncBufRead + Unpin> LineBatcher<R> {
    pub fn new(reader: R, batch_size: usize) -> Self {
        Self {
            lines: reader.lines(),
            batch_size,
            header_skipped: false,
        }
    }

    /// Returns the next batch of up to `batch_size` lines, or `None` once
    /// the stream is exhausted. A trailing short batch is emitted, never
    /// discarded; a header-only (or empty) stream yields no batches.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<String>>> {
        if !self.header_skipped {
            self.header_skipped = true;
            if self.lines.next_line().await?.is_none() {
                return Ok(None);
            }
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.lines.next_line().await? {
                Some(line) => batch.push(line),
                None => break,
            }
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    fn reader(text: &str) -> BufReader<&[u8]> {
        BufReader::new(text.as_bytes())
    }

    async fn collect_batches(text: &str, batch_size: usize) -> Vec<Vec<String>> {
        let mut batcher = LineBatcher::new(reader(text), batch_size);
        let mut batches = Vec::new();
        while let Some(batch) = batcher.next_batch().await.unwrap() {
            batches.push(batch);
        }
        batches
    }

    #[tokio::test]
    async fn splits_into_full_and_trailing_batch() {
        let text = "header\na\nb\nc\nd\ne\nf\ng\n";
        let batches = collect_batches(text, 5).await;

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], vec!["a", "b", "c", "d", "e"]);
        assert_eq!(batches[1], vec!["f", "g"]);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_short_batch() {
        let text = "header\na\nb\nc\nd\n";
        let batches = collect_batches(text, 2).await;

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 2);
    }

    #[tokio::test]
    async fn header_only_yields_no_batches() {
        assert!(collect_batches("header\n", 5).await.is_empty());
        assert!(collect_batches("header", 5).await.is_empty());
    }

    #[tokio::test]
    async fn empty_stream_yields_no_batches() {
        assert!(collect_batches("", 5).await.is_empty());
    }

    #[tokio::test]
    async fn preserves_line_order() {
        let text = "header\n1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let batches = collect_batches(text, 4).await;

        let flat: Vec<String> = batches.into_iter().flatten().collect();
        let expected: Vec<String> = (1..=9).map(|i| i.to_string()).collect();
        assert_eq!(flat, expected);
    }
}
