//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the listing and user repository ports backed
//! by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures are mapped onto the
//!   port error enums.
//!
//! # Example
//!
//! ```no_run
//! use listings::outbound::persistence::{DbPool, DieselListingRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), listings::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/listings")).await?;
//! let listings = DieselListingRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_listing_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
