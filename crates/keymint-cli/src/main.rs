mod cli;
mod output;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use keymint::core::now_millis;
use keymint::perms::StaticCatalog;
use keymint::store::SqliteStore;
use keymint::{Issuer, IssuerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(&cli);

    match run(&cli) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("keymint: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Issue one token and return the line to print.
fn run(cli: &Cli) -> Result<String> {
    let catalog = match &cli.catalog {
        Some(path) => StaticCatalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => StaticCatalog::builtin(),
    };

    // Reject bad input before the database file is created.
    let request = cli.request();
    request.validate(&catalog, now_millis())?;

    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("opening database {}", cli.db.display()))?;
    let issuer = Issuer::new(
        store,
        catalog,
        IssuerConfig {
            save_mode: cli.save_mode(),
        },
    );

    let record = issuer.issue(&request)?;
    tracing::debug!(
        token = %record.id(),
        granted = ?issuer.codec().describe(record.permissions()),
        "issued"
    );

    output::render(record.id(), cli.json).context("rendering output")
}
