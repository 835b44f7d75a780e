//! Mint a bearer token for an account, registering the account if needed.
//!
//! The signing secret is read from `LISTINGS_JWT_SECRET` so that tokens
//! verify against a server started with the same environment.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;

use listings::cli::{ensure_user, resolve_database_url};
use listings::domain::Email;
use listings::outbound::auth::{JwtSecret, JwtTokenIssuer};
use listings::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

const JWT_SECRET_ENV: &str = "LISTINGS_JWT_SECRET";

/// `issue-token` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "issue-token",
    about = "Issue an HS256 bearer token for a user account",
    version
)]
struct CliArgs {
    /// Email address of the account to authenticate as.
    #[arg(long = "email", value_name = "email", value_parser = parse_email)]
    email: Email,
    /// Token lifetime in hours.
    #[arg(
        long = "ttl-hours",
        value_name = "hours",
        default_value_t = 24,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ttl_hours: u64,
    /// Database connection URL. Falls back to `LISTINGS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn parse_email(raw: &str) -> Result<Email, String> {
    Email::new(raw).map_err(|error| error.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args))
}

fn load_secret() -> Result<JwtSecret> {
    let secret = env::var(JWT_SECRET_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| eyre!("{JWT_SECRET_ENV} must be set to the server's signing secret"))?;
    Ok(JwtSecret::new(secret))
}

async fn run(args: CliArgs) -> Result<()> {
    let secret = load_secret()?;
    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to create database pool")?;
    let users = DieselUserRepository::new(pool);
    let account = ensure_user(&users, &args.email)
        .await
        .wrap_err("failed to resolve user account")?;

    let ttl = Duration::from_secs(args.ttl_hours.saturating_mul(60 * 60));
    let token = JwtTokenIssuer::new(&secret, Arc::new(DefaultClock))
        .with_ttl(ttl)
        .issue(account.id())
        .wrap_err("failed to sign token")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{token}")?;
    Ok(())
}
