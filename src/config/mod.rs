pub mod file;

use clap::Parser;

use crate::config::file::FileConfig;
use crate::domain::ports::ImportConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};

pub const DEFAULT_BATCH_SIZE: usize = 5000;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;
pub const DEFAULT_OUTPUT: &str = "./output/accounts.jsonl";

#[derive(Debug, Clone, Parser)]
#[command(name = "payable-import")]
#[command(about = "Bulk CSV importer for payable accounts")]
pub struct CliConfig {
    /// CSV feed to import; the first line is a header and is skipped
    #[arg(long)]
    pub input: String,

    /// Lines per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Maximum batches in flight at once
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Worker threads for the runtime; defaults to the number of cores
    #[arg(long)]
    pub worker_threads: Option<usize>,

    /// Destination JSONL file
    #[arg(long)]
    pub output: Option<String>,

    /// Optional TOML config file; explicit flags take precedence
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log in JSON format")]
    pub log_json: bool,
}

impl CliConfig {
    /// Fills any knob not given on the command line from the config file,
    /// then from the built-in defaults, and validates the result.
    pub fn resolve(self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let settings = Settings {
            input: self.input,
            batch_size: self
                .batch_size
                .or(file.batch_size)
                .unwrap_or(DEFAULT_BATCH_SIZE),
            max_in_flight: self
                .max_in_flight
                .or(file.max_in_flight)
                .unwrap_or(DEFAULT_MAX_IN_FLIGHT),
            worker_threads: self.worker_threads.or(file.worker_threads),
            output: self
                .output
                .or(file.output)
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            verbose: self.verbose,
            log_json: self.log_json,
        };

        settings.validate()?;
        Ok(settings)
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: String,
    pub batch_size: usize,
    pub max_in_flight: usize,
    pub worker_threads: Option<usize>,
    pub output: String,
    pub verbose: bool,
    pub log_json: bool,
}

impl ImportConfig for Settings {
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output", &self.output)?;
        validate_positive_number("batch_size", self.batch_size, 1)?;
        validate_positive_number("max_in_flight", self.max_in_flight, 1)?;
        if let Some(threads) = self.worker_threads {
            validate_positive_number("worker_threads", threads, 1)?;
        }
        Ok(())
    }
}
