//! Helpers shared by the command-line tools.

use std::env;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, UserAccount, UserId};

/// Environment variable consulted when `--database-url` is omitted.
pub const DATABASE_URL_ENV: &str = "LISTINGS_DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseUrlError {
    #[error("--database-url must not be empty when provided")]
    EmptyFlag,
    #[error("database URL missing: set --database-url or {DATABASE_URL_ENV}")]
    Missing,
}

/// Prefer the explicit flag, then [`DATABASE_URL_ENV`].
pub fn resolve_database_url(explicit: Option<String>) -> Result<String, DatabaseUrlError> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(DatabaseUrlError::EmptyFlag);
        }
        return Ok(value);
    }
    env::var(DATABASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(DatabaseUrlError::Missing)
}

/// Return the account registered under `email`, registering it when absent.
pub async fn ensure_user<U>(users: &U, email: &Email) -> Result<UserAccount, UserPersistenceError>
where
    U: UserRepository + ?Sized,
{
    if let Some(existing) = users.find_by_email(email).await? {
        return Ok(existing);
    }
    let account = UserAccount::new(UserId::random(), email.clone());
    users.insert(&account).await?;
    info!(user_id = %account.id(), %email, "registered user");
    Ok(account)
}
