//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//! - **cache**: Redis-backed and in-memory snapshot caches
//! - **auth**: HS256 JWT token verification and issuance
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod auth;
pub mod cache;
pub mod memory;
pub mod persistence;
