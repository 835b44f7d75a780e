//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::Principal;
use crate::domain::ports::{
    MockListingCatalog, MockTokenVerifier, MockUserRelations, TokenVerificationError,
};

use super::state::HttpState;

/// Token accepted by [`verifier_accepting`].
pub const GOOD_TOKEN: &str = "good-token";

/// Verifier resolving [`GOOD_TOKEN`] to `principal` and rejecting anything else.
pub fn verifier_accepting(principal: Principal) -> MockTokenVerifier {
    let mut tokens = MockTokenVerifier::new();
    tokens.expect_verify().returning(move |token| {
        if token == GOOD_TOKEN {
            Ok(principal.clone())
        } else {
            Err(TokenVerificationError::invalid("bad signature"))
        }
    });
    tokens
}

/// State whose use-case ports are strict mocks with no expectations.
pub fn state_with_tokens(tokens: MockTokenVerifier) -> HttpState {
    state_with(MockListingCatalog::new(), MockUserRelations::new(), tokens)
}

pub fn state_with(
    catalog: MockListingCatalog,
    relations: MockUserRelations,
    tokens: MockTokenVerifier,
) -> HttpState {
    HttpState::new(Arc::new(catalog), Arc::new(relations), Arc::new(tokens))
}

/// `Authorization` header value carrying [`GOOD_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("authorization", format!("Bearer {GOOD_TOKEN}"))
}
