//! Bearer token authentication for HTTP handlers.
//!
//! Handlers that require a caller take an [`Authenticated`] argument. The
//! extractor reads `Authorization: Bearer <token>` and asks the configured
//! [`TokenVerifier`](crate::domain::ports::TokenVerifier) for the principal.
//! Every failure collapses to the same 401 so clients cannot probe which
//! check rejected them.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error};

use crate::domain::ports::TokenVerificationError;
use crate::domain::{Error, Principal};

use super::state::HttpState;

pub(crate) const UNAUTHENTICATED_MESSAGE: &str = "Please authenticate.";

/// Caller identity established from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub Principal);

impl Authenticated {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn unauthenticated() -> Error {
    Error::unauthorized(UNAUTHENTICATED_MESSAGE)
}

/// Extract the token from an `Authorization` header value.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                return Err(unauthenticated().into());
            };
            let Some(state) = state else {
                error!("HttpState missing from app data");
                return Err(Error::internal("authentication is not configured").into());
            };
            match state.tokens.verify(&token).await {
                Ok(principal) => Ok(Self(principal)),
                Err(TokenVerificationError::Backend { message }) => {
                    error!(error = %message, "token verification backend failed");
                    Err(unauthenticated().into())
                }
                Err(err) => {
                    debug!(error = %err, "bearer token rejected");
                    Err(unauthenticated().into())
                }
            }
        })
    }
}
