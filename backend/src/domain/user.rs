//! User data model.
//!
//! Users belong to exactly one organization and carry a role. Email
//! addresses are normalised (trimmed, lower-cased) before they are compared
//! or stored so that uniqueness holds regardless of client casing.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::organization::OrganizationId;

/// Maximum user name length, counted in characters after trimming.
pub const USER_NAME_MAX: usize = 255;
/// Maximum stored email length.
pub const EMAIL_MAX: usize = 255;

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong { max: usize },
    InvalidEmail,
    InvalidRole,
    InvalidOrganizationId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "User name is required"),
            Self::NameTooLong { max } => {
                write!(f, "User name must be between 1 and {max} characters")
            }
            Self::InvalidEmail => write!(f, "Please provide a valid email address"),
            Self::InvalidRole => write!(f, "Role must be either Admin or Member"),
            Self::InvalidOrganizationId => write!(f, "Valid organization ID is required"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier read from the store.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Parse a positive integer identifier from untrusted text.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<i32>()
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User role within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Member,
}

impl Role {
    /// Stored and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    /// Roles are matched exactly; `"admin"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Member" => Ok(Self::Member),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

/// Trimmed, non-empty user name of at most [`USER_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only: one `@`, no whitespace, a dotted domain ending in
        // an alphabetic TLD of two or more letters. Input is already lower-cased.
        let pattern = r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)*\.[a-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address.
///
/// # Examples
/// ```
/// use orgdirectory::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Jo@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "jo@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.len() > EMAIL_MAX || !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated attributes for creating or overwriting a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: UserName,
    pub email: EmailAddress,
    pub role: Role,
    pub organization_id: OrganizationId,
}

/// Unvalidated user fields as received from a client.
///
/// `organization_id` holds the textual form of whatever the client sent so
/// that numbers and numeric strings are treated alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub organization_id: Option<String>,
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization_id: OrganizationId,
    pub created_at: DateTime<Utc>,
}

/// Reduced organization view nested inside a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSummary {
    pub id: OrganizationId,
    pub name: String,
}

/// User joined with its organization summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithOrganization {
    pub user: User,
    pub organization: OrganizationSummary,
}
