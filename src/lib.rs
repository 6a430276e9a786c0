pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{JsonlStore, MemoryStore};
pub use crate::config::{CliConfig, Settings};
pub use crate::core::import::Importer;
pub use crate::domain::model::{AccountRecord, AccountStatus, BatchOutcome, ImportSummary};
pub use crate::domain::ports::{AccountStore, ImportConfig};
pub use crate::utils::error::{ImportError, Result};
