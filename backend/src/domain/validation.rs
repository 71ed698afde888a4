//! Request validation for organization and user writes.
//!
//! Each function checks every field and reports all failures at once, in
//! field order, so clients can highlight the whole form in one round trip.
//! No store access happens here.

use crate::domain::organization::{
    OrganizationAddress, OrganizationDraft, OrganizationId, OrganizationInput, OrganizationName,
};
use crate::domain::user::{
    EmailAddress, Role, UserDraft, UserInput, UserName, UserValidationError,
};
use crate::domain::{Error, FieldError};

fn field_error(field: &str, error: impl ToString) -> FieldError {
    FieldError::new(field, error.to_string())
}

/// Validate organization fields into a draft.
///
/// # Examples
/// ```
/// use orgdirectory::domain::OrganizationInput;
/// use orgdirectory::domain::validation::validate_organization;
///
/// let input = OrganizationInput {
///     name: Some(" Acme ".into()),
///     address: Some("1 Main St".into()),
/// };
/// let draft = validate_organization(&input).expect("valid input");
/// assert_eq!(draft.name.as_str(), "Acme");
/// ```
pub fn validate_organization(input: &OrganizationInput) -> Result<OrganizationDraft, Error> {
    let mut errors = Vec::new();

    let name = OrganizationName::new(input.name.as_deref().unwrap_or_default())
        .map_err(|err| errors.push(field_error("name", err)))
        .ok();
    let address = OrganizationAddress::new(input.address.as_deref().unwrap_or_default())
        .map_err(|err| errors.push(field_error("address", err)))
        .ok();

    match (name, address) {
        (Some(name), Some(address)) if errors.is_empty() => Ok(OrganizationDraft { name, address }),
        _ => Err(Error::validation_failed(errors)),
    }
}

/// Validate user fields for a new user.
///
/// An omitted role defaults to [`Role::Member`]; the organization id must be
/// a positive integer. Whether the organization exists is checked later by
/// the service.
pub fn validate_user(input: &UserInput) -> Result<UserDraft, Error> {
    validate_user_fields(input, Some(Role::default()))
}

/// Validate user fields for a full-record update.
///
/// Unlike [`validate_user`], the role is required: an update never falls
/// back to [`Role::Member`].
pub fn validate_user_update(input: &UserInput) -> Result<UserDraft, Error> {
    validate_user_fields(input, None)
}

fn validate_user_fields(
    input: &UserInput,
    omitted_role: Option<Role>,
) -> Result<UserDraft, Error> {
    let mut errors = Vec::new();

    let name = UserName::new(input.name.as_deref().unwrap_or_default())
        .map_err(|err| errors.push(field_error("name", err)))
        .ok();
    let email = EmailAddress::new(input.email.as_deref().unwrap_or_default())
        .map_err(|err| errors.push(field_error("email", err)))
        .ok();
    let role = match (input.role.as_deref(), omitted_role) {
        (None, Some(role)) => Some(role),
        (None, None) => {
            errors.push(field_error("role", UserValidationError::InvalidRole));
            None
        }
        (Some(raw), _) => raw
            .parse::<Role>()
            .map_err(|err| errors.push(field_error("role", err)))
            .ok(),
    };
    let organization_id = input
        .organization_id
        .as_deref()
        .and_then(OrganizationId::parse)
        .or_else(|| {
            errors.push(field_error(
                "org_id",
                UserValidationError::InvalidOrganizationId,
            ));
            None
        });

    match (name, email, role, organization_id) {
        (Some(name), Some(email), Some(role), Some(organization_id)) if errors.is_empty() => {
            Ok(UserDraft {
                name,
                email,
                role,
                organization_id,
            })
        }
        _ => Err(Error::validation_failed(errors)),
    }
}
