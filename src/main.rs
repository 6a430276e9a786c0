use anyhow::Context;
use clap::Parser;
use payable_import::config::Settings;
use payable_import::utils::logger;
use payable_import::{CliConfig, Importer, JsonlStore};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting payable-import");

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {e}");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    if settings.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    // The runtime's worker threads are the execution pool; max_in_flight
    // bounds dispatched batches independently of it.
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = settings.worker_threads {
        builder.worker_threads(threads);
    }
    let runtime = builder.build()?;

    runtime.block_on(run(settings))
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let input = tokio::fs::File::open(&settings.input)
        .await
        .with_context(|| format!("cannot open input file {}", settings.input))?;
    let reader = tokio::io::BufReader::new(input);

    let store = JsonlStore::open(&settings.output).await?;
    let output = settings.output.clone();
    let importer = Importer::new(store, settings);

    match importer.run(reader).await {
        Ok(summary) => {
            println!(
                "✅ Imported {} records in {} batches",
                summary.records_committed, summary.batches_committed
            );
            println!("📁 Output saved to: {}", output);
            Ok(())
        }
        Err(e) => {
            if let Some(committed) = e.committed() {
                eprintln!(
                    "❌ Import failed; {} records from batches committed before the failure remain in {}",
                    committed, output
                );
            }
            eprintln!("❌ {e}");
            std::process::exit(2);
        }
    }
}
