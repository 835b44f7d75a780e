//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ListingCatalog, TokenVerifier, UserRelations};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn ListingCatalog>,
    pub relations: Arc<dyn UserRelations>,
    pub tokens: Arc<dyn TokenVerifier>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use listings::domain::ports::{ListingCatalog, TokenVerifier, UserRelations};
    /// use listings::inbound::http::state::HttpState;
    ///
    /// fn build(
    ///     catalog: Arc<dyn ListingCatalog>,
    ///     relations: Arc<dyn UserRelations>,
    ///     tokens: Arc<dyn TokenVerifier>,
    /// ) -> HttpState {
    ///     HttpState::new(catalog, relations, tokens)
    /// }
    /// ```
    pub fn new(
        catalog: Arc<dyn ListingCatalog>,
        relations: Arc<dyn UserRelations>,
        tokens: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            catalog,
            relations,
            tokens,
        }
    }
}
