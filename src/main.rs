use clap::Parser;
use library_lending::application::lending::LendingEngine;
use library_lending::config::LendingPolicy;
use library_lending::domain::ports::{CatalogStoreBox, LoanStoreBox};
use library_lending::infrastructure::gateway::SimulatedPaymentGateway;
use library_lending::infrastructure::in_memory::{InMemoryCatalogStore, InMemoryLoanStore};
use library_lending::interfaces::csv::catalog_reader::CatalogReader;
use library_lending::interfaces::csv::command_reader::CommandReader;
use library_lending::interfaces::csv::outcome_writer::OutcomeWriter;
use library_lending::interfaces::runner::CommandRunner;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Desk commands CSV file
    input: PathBuf,

    /// Catalog CSV (title, author, isbn, copies) loaded before any command runs
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Lending policy JSON. Defaults apply when omitted.
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let policy = match &cli.policy {
        Some(path) => LendingPolicy::from_json_file(path).into_diagnostic()?,
        None => LendingPolicy::default(),
    };

    let catalog: CatalogStoreBox = Box::new(InMemoryCatalogStore::new());
    let loans: LoanStoreBox = Box::new(InMemoryLoanStore::new());
    let engine = LendingEngine::new(catalog, loans, policy);

    if let Some(path) = cli.catalog {
        let file = File::open(path).into_diagnostic()?;
        for row in CatalogReader::new(file).rows() {
            match row {
                Ok(row) => {
                    if let Err(e) = engine
                        .add_book(&row.title, &row.author, &row.isbn, row.copies)
                        .await
                    {
                        eprintln!("Error adding book {}: {}", row.isbn, e);
                    }
                }
                Err(e) => eprintln!("Error reading catalog row: {}", e),
            }
        }
    }

    let runner = CommandRunner::new(engine, Box::new(SimulatedPaymentGateway::new()));

    let file = File::open(cli.input).into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());
    for command in CommandReader::new(file).commands() {
        match command {
            Ok(command) => {
                let outcome = runner.run(command).await;
                writer.write(&outcome).into_diagnostic()?;
            }
            Err(e) => eprintln!("Error reading command: {}", e),
        }
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
