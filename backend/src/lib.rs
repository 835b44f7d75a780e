//! Property listing catalog service.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the listing and
//! user models, the driving and driven ports, and the services that apply
//! caching and ownership rules. [`inbound`] adapts HTTP requests onto the
//! driving ports and [`outbound`] implements the driven ports over
//! PostgreSQL, Redis, and in-process stores.

pub mod cli;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
