//! Bulk-load listings from a CSV file into PostgreSQL.
//!
//! Every imported listing is owned by the `--owner` account, which is
//! registered on first use. Rows that fail validation are skipped and
//! counted rather than aborting the run.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use mockable::{Clock, DefaultClock};
use tokio::runtime::Builder;

use listings::cli::{ensure_user, resolve_database_url};
use listings::domain::Email;
use listings::inbound::csv_import::import_listings;
use listings::outbound::persistence::{
    DbPool, DieselListingRepository, DieselUserRepository, PoolConfig,
};

/// `import-listings` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-listings",
    about = "Import property listings from a CSV file",
    version
)]
struct CliArgs {
    /// CSV file to read. Reads standard input when omitted.
    #[arg(long = "file", value_name = "path")]
    file: Option<PathBuf>,
    /// Email address of the account that will own the imported listings.
    #[arg(long = "owner", value_name = "email", value_parser = parse_email)]
    owner: Email,
    /// Database connection URL. Falls back to `LISTINGS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn parse_email(raw: &str) -> Result<Email, String> {
    Email::new(raw).map_err(|error| error.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args))
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open CSV file {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let input = open_input(args.file.as_ref())?;
    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to create database pool")?;

    let users = DieselUserRepository::new(pool.clone());
    let owner = ensure_user(&users, &args.owner)
        .await
        .wrap_err("failed to resolve listing owner")?;

    let repository = DieselListingRepository::new(pool);
    let summary = import_listings(input, owner.id(), &repository, DefaultClock.utc())
        .await
        .wrap_err("CSV import failed")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "imported={}", summary.imported)?;
    writeln!(stdout, "skipped={}", summary.skipped)?;
    Ok(())
}
