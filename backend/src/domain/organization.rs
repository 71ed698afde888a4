//! Organization data model.
//!
//! An organization groups zero or more users. Its name and address are the
//! only mutable attributes; the identifier and creation timestamp are
//! assigned by the store and never change.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::user::{Role, UserId};

/// Maximum organization name length, counted in characters after trimming.
pub const ORGANIZATION_NAME_MAX: usize = 255;

/// Validation errors returned by the organization field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyAddress,
}

impl fmt::Display for OrganizationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Organization name is required"),
            Self::NameTooLong { max } => {
                write!(f, "Organization name must be between 1 and {max} characters")
            }
            Self::EmptyAddress => write!(f, "Organization address is required"),
        }
    }
}

impl std::error::Error for OrganizationValidationError {}

/// Store-assigned organization identifier.
///
/// # Examples
/// ```
/// use orgdirectory::domain::OrganizationId;
///
/// assert_eq!(OrganizationId::parse("42").map(|id| id.get()), Some(42));
/// assert!(OrganizationId::parse("0").is_none());
/// assert!(OrganizationId::parse("abc").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrganizationId(i32);

impl OrganizationId {
    /// Wrap a raw identifier read from the store.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Parse a positive integer identifier from untrusted text.
    ///
    /// Returns `None` for anything that cannot name a stored record.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<i32>()
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
    }

    /// Underlying integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trimmed, non-empty organization name of at most
/// [`ORGANIZATION_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Validate and construct an [`OrganizationName`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, OrganizationValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(OrganizationValidationError::EmptyName);
        }
        if trimmed.chars().count() > ORGANIZATION_NAME_MAX {
            return Err(OrganizationValidationError::NameTooLong {
                max: ORGANIZATION_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Trimmed, non-empty postal address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationAddress(String);

impl OrganizationAddress {
    /// Validate and construct an [`OrganizationAddress`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, OrganizationValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(OrganizationValidationError::EmptyAddress);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated attributes for creating or overwriting an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationDraft {
    pub name: OrganizationName,
    pub address: OrganizationAddress,
}

/// Unvalidated organization fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationInput {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Persisted organization record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Reduced user view nested inside an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Organization joined with the users that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationWithUsers {
    pub organization: Organization,
    pub users: Vec<UserSummary>,
}

/// Outcome of a guarded organization delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationDeletion {
    Deleted,
    NotFound,
    HasUsers { user_count: i64 },
}
