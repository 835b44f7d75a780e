//! Driven port turning bearer tokens into principals.
use async_trait::async_trait;

use crate::domain::Principal;

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer token was not accepted.
    pub enum TokenVerificationError {
        /// Signature, format, or expiry check failed.
        Invalid { message: String } => "token rejected: {message}",
        /// Token is valid but names a user that does not exist.
        UnknownSubject => "token subject does not exist",
        /// User lookup failed.
        Backend { message: String } => "token verification backend failed: {message}",
    }
}

/// Opaque "verify token, return principal" oracle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and resolve the principal it names.
    async fn verify(&self, token: &str) -> Result<Principal, TokenVerificationError>;
}
