pub mod batcher;
pub mod import;

pub use crate::domain::model::{AccountRecord, BatchOutcome, ImportSummary};
pub use crate::domain::ports::{AccountStore, ImportConfig};
pub use crate::utils::error::Result;
