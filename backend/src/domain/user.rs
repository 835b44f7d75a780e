//! User identity, the authenticated principal, and per-user relations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::listing::{ListingId, UserSummary};

/// Validation errors for user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Public e-mail address, normalised to trimmed lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated caller produced by the token verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    email: Email,
}

impl Principal {
    /// Identity resolved from a verified token.
    pub fn new(id: UserId, email: Email) -> Self {
        Self { id, email }
    }

    /// Account behind the token.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Email registered for the account.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Public identity embedded in responses.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Recommendation received by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub listing: ListingId,
    pub from: UserId,
    pub recommended_at: DateTime<Utc>,
}

/// User with favorites and received recommendations.
///
/// ## Invariants
/// - `favorites` holds each listing at most once.
/// - `recommendations` holds at most one entry per (listing, sender) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    email: Email,
    favorites: Vec<ListingId>,
    recommendations: Vec<Recommendation>,
}

impl UserAccount {
    /// Create an account with no relations.
    pub fn new(id: UserId, email: Email) -> Self {
        Self {
            id,
            email,
            favorites: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Rehydrate an account from storage, dropping duplicate relations.
    pub fn restore(
        id: UserId,
        email: Email,
        favorites: Vec<ListingId>,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let mut account = Self::new(id, email);
        for listing in favorites {
            account.add_favorite(listing);
        }
        for entry in recommendations {
            account.receive_recommendation(entry);
        }
        account
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn favorites(&self) -> &[ListingId] {
        &self.favorites
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Identity of this account as a principal.
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.email.clone())
    }

    pub fn has_favorite(&self, listing: ListingId) -> bool {
        self.favorites.contains(&listing)
    }

    /// Append a favorite; returns `false` when already present.
    pub fn add_favorite(&mut self, listing: ListingId) -> bool {
        if self.has_favorite(listing) {
            return false;
        }
        self.favorites.push(listing);
        true
    }

    /// Remove a favorite; returns `false` when it was not present.
    pub fn remove_favorite(&mut self, listing: ListingId) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|existing| *existing != listing);
        self.favorites.len() != before
    }

    pub fn has_recommendation(&self, listing: ListingId, from: UserId) -> bool {
        self.recommendations
            .iter()
            .any(|entry| entry.listing == listing && entry.from == from)
    }

    /// Append a recommendation; returns `false` for a repeated (listing, sender) pair.
    pub fn receive_recommendation(&mut self, entry: Recommendation) -> bool {
        if self.has_recommendation(entry.listing, entry.from) {
            return false;
        }
        self.recommendations.push(entry);
        true
    }
}
