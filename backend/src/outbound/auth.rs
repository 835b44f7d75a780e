//! HS256 JWT bearer tokens.
//!
//! [`JwtTokenVerifier`] implements the [`TokenVerifier`] port: it checks the
//! signature and expiry, then resolves the `sub` claim to an existing user.
//! [`JwtTokenIssuer`] mints tokens for development and tooling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenVerificationError, TokenVerifier, UserRepository};
use crate::domain::{Principal, UserId};

/// Lifetime of tokens minted by [`JwtTokenIssuer::new`].
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Shared HMAC secret. The bytes are wiped when the last handle drops.
#[derive(Clone)]
pub struct JwtSecret(Arc<Zeroizing<Vec<u8>>>);

impl JwtSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(Zeroizing::new(secret.into())))
    }

    fn bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret(**redacted**)")
    }
}

/// Claims carried by listing service tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Token verifier resolving subjects through the user store.
pub struct JwtTokenVerifier<U: ?Sized> {
    users: Arc<U>,
    key: DecodingKey,
    validation: Validation,
}

impl<U: ?Sized> JwtTokenVerifier<U> {
    pub fn new(secret: &JwtSecret, users: Arc<U>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            users,
            key: DecodingKey::from_secret(secret.bytes()),
            validation,
        }
    }
}

#[async_trait]
impl<U> TokenVerifier for JwtTokenVerifier<U>
where
    U: UserRepository + ?Sized,
{
    async fn verify(&self, token: &str) -> Result<Principal, TokenVerificationError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| TokenVerificationError::invalid(err.to_string()))?;
        let id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| TokenVerificationError::invalid("subject is not a user id"))?;

        let account = self
            .users
            .find_by_id(&id)
            .await
            .map_err(|err| TokenVerificationError::backend(err.to_string()))?;
        match account {
            Some(account) => Ok(account.principal()),
            None => {
                debug!(user_id = %id, "token names unknown user");
                Err(TokenVerificationError::unknown_subject())
            }
        }
    }
}

/// Mints HS256 tokens.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    key: EncodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    pub fn new(secret: &JwtSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.bytes()),
            ttl: DEFAULT_TOKEN_TTL,
            clock,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign a token naming `user`.
    ///
    /// # Errors
    ///
    /// Returns the signing error from `jsonwebtoken`.
    pub fn issue(&self, user: UserId) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = self.clock.utc().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserAccount;
    use crate::domain::ports::MockUserRepository;
    use crate::test_support::{MutableClock, epoch, principal};
    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn secret() -> JwtSecret {
        JwtSecret::new("test-secret")
    }

    fn issuer_at_now(secret: &JwtSecret) -> JwtTokenIssuer {
        JwtTokenIssuer::new(secret, Arc::new(MutableClock::new(Utc::now())))
    }

    #[rstest]
    #[tokio::test]
    async fn valid_token_resolves_the_principal(secret: JwtSecret) {
        let user = principal("owner@example.com");
        let account = UserAccount::new(user.id(), user.email().clone());
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(user.id()))
            .times(1)
            .return_once(move |_| Ok(Some(account)));

        let token = issuer_at_now(&secret).issue(user.id()).expect("sign");
        let verified = JwtTokenVerifier::new(&secret, Arc::new(users))
            .verify(&token)
            .await
            .expect("valid token");
        assert_eq!(verified, user);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_subject_is_rejected(secret: JwtSecret) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let token = issuer_at_now(&secret).issue(UserId::random()).expect("sign");
        let err = JwtTokenVerifier::new(&secret, Arc::new(users))
            .verify(&token)
            .await
            .expect_err("unknown user");
        assert_eq!(err, TokenVerificationError::UnknownSubject);
    }

    #[rstest]
    #[case::wrong_secret(JwtSecret::new("other-secret"), false)]
    #[case::expired(JwtSecret::new("test-secret"), true)]
    #[tokio::test]
    async fn bad_tokens_never_reach_the_store(
        secret: JwtSecret,
        #[case] signing: JwtSecret,
        #[case] expired: bool,
    ) {
        let clock = if expired {
            MutableClock::new(epoch())
        } else {
            MutableClock::new(Utc::now())
        };
        let token = JwtTokenIssuer::new(&signing, Arc::new(clock))
            .issue(UserId::random())
            .expect("sign");
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let err = JwtTokenVerifier::new(&secret, Arc::new(users))
            .verify(&token)
            .await
            .expect_err("rejected");
        assert!(matches!(err, TokenVerificationError::Invalid { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn garbage_is_invalid(secret: JwtSecret) {
        let users = MockUserRepository::new();
        let err = JwtTokenVerifier::new(&secret, Arc::new(users))
            .verify("not.a.jwt")
            .await
            .expect_err("garbage");
        assert!(matches!(err, TokenVerificationError::Invalid { .. }));
    }

    #[rstest]
    fn secret_debug_is_redacted(secret: JwtSecret) {
        assert!(!format!("{secret:?}").contains("test-secret"));
    }
}
