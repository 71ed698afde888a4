//! Process-local directory store.
//!
//! [`InMemoryDirectory`] implements both repository ports over one mutex so
//! every operation observes and mutates organizations and users atomically.
//! It mirrors the PostgreSQL constraints: unique email, a restricting
//! organization foreign key, and newest-first ordering.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    OrganizationRepository, OrganizationRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    EmailAddress, Organization, OrganizationDeletion, OrganizationDraft, OrganizationId,
    OrganizationSummary, OrganizationWithUsers, User, UserDraft, UserId, UserSummary,
    UserWithOrganization,
};

#[derive(Debug, Default)]
struct Tables {
    organizations: BTreeMap<OrganizationId, Organization>,
    users: BTreeMap<UserId, User>,
    last_organization_id: i32,
    last_user_id: i32,
}

impl Tables {
    fn organizations_newest_first(&self) -> Vec<&Organization> {
        let mut rows: Vec<&Organization> = self.organizations.values().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    fn users_newest_first(&self, filter: impl Fn(&User) -> bool) -> Vec<&User> {
        let mut rows: Vec<&User> = self.users.values().filter(|user| filter(user)).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    fn with_users(&self, organization: &Organization) -> OrganizationWithUsers {
        let users = self
            .users_newest_first(|user| user.organization_id == organization.id)
            .into_iter()
            .map(|user| UserSummary {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
            })
            .collect();
        OrganizationWithUsers {
            organization: organization.clone(),
            users,
        }
    }

    fn joined(&self, user: &User) -> Option<UserWithOrganization> {
        let organization = self.organizations.get(&user.organization_id)?;
        Some(UserWithOrganization {
            user: user.clone(),
            organization: OrganizationSummary {
                id: organization.id,
                name: organization.name.clone(),
            },
        })
    }

    fn email_taken(&self, email: &str, excluding: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != excluding)
    }

    /// Enforce the unique email index and the organization foreign key.
    fn check_constraints(
        &self,
        draft: &UserDraft,
        excluding: Option<UserId>,
    ) -> Result<(), UserRepositoryError> {
        if self.email_taken(draft.email.as_str(), excluding) {
            return Err(UserRepositoryError::duplicate_email(draft.email.as_str()));
        }
        if !self.organizations.contains_key(&draft.organization_id) {
            return Err(UserRepositoryError::organization_missing(
                draft.organization_id.get(),
            ));
        }
        Ok(())
    }
}

/// Directory store held in process memory.
///
/// Data is lost on restart. Identifiers start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    tables: Mutex<Tables>,
}

impl InMemoryDirectory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic mid-operation leaves the maps structurally valid.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryDirectory {
    async fn list_with_users(
        &self,
    ) -> Result<Vec<OrganizationWithUsers>, OrganizationRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .organizations_newest_first()
            .into_iter()
            .map(|organization| tables.with_users(organization))
            .collect())
    }

    async fn find_with_users(
        &self,
        id: OrganizationId,
    ) -> Result<Option<OrganizationWithUsers>, OrganizationRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .organizations
            .get(&id)
            .map(|organization| tables.with_users(organization)))
    }

    async fn find(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        Ok(self.lock().organizations.get(&id).cloned())
    }

    async fn insert(
        &self,
        draft: &OrganizationDraft,
    ) -> Result<Organization, OrganizationRepositoryError> {
        let mut tables = self.lock();
        tables.last_organization_id += 1;
        let organization = Organization {
            id: OrganizationId::new(tables.last_organization_id),
            name: draft.name.as_str().to_owned(),
            address: draft.address.as_str().to_owned(),
            created_at: Utc::now(),
        };
        tables
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn update(
        &self,
        id: OrganizationId,
        draft: &OrganizationDraft,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let mut tables = self.lock();
        Ok(tables.organizations.get_mut(&id).map(|organization| {
            organization.name = draft.name.as_str().to_owned();
            organization.address = draft.address.as_str().to_owned();
            organization.clone()
        }))
    }

    async fn delete_if_unused(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDeletion, OrganizationRepositoryError> {
        let mut tables = self.lock();
        if !tables.organizations.contains_key(&id) {
            return Ok(OrganizationDeletion::NotFound);
        }

        let members = tables
            .users
            .values()
            .filter(|user| user.organization_id == id)
            .count();
        if members > 0 {
            return Ok(OrganizationDeletion::HasUsers {
                user_count: i64::try_from(members).unwrap_or(i64::MAX),
            });
        }

        tables.organizations.remove(&id);
        Ok(OrganizationDeletion::Deleted)
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn list(&self) -> Result<Vec<UserWithOrganization>, UserRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .users_newest_first(|_| true)
            .into_iter()
            .filter_map(|user| tables.joined(user))
            .collect())
    }

    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserWithOrganization>, UserRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .users_newest_first(|user| user.organization_id == organization_id)
            .into_iter()
            .filter_map(|user| tables.joined(user))
            .collect())
    }

    async fn find(&self, id: UserId) -> Result<Option<UserWithOrganization>, UserRepositoryError> {
        let tables = self.lock();
        Ok(tables.users.get(&id).and_then(|user| tables.joined(user)))
    }

    async fn email_in_use(
        &self,
        email: &EmailAddress,
        excluding: Option<UserId>,
    ) -> Result<bool, UserRepositoryError> {
        Ok(self.lock().email_taken(email.as_str(), excluding))
    }

    async fn insert(&self, draft: &UserDraft) -> Result<UserWithOrganization, UserRepositoryError> {
        let mut tables = self.lock();
        tables.check_constraints(draft, None)?;

        tables.last_user_id += 1;
        let user = User {
            id: UserId::new(tables.last_user_id),
            name: draft.name.as_str().to_owned(),
            email: draft.email.as_str().to_owned(),
            role: draft.role,
            organization_id: draft.organization_id,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        tables
            .joined(&user)
            .ok_or_else(|| UserRepositoryError::query("organization vanished during insert"))
    }

    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<UserWithOrganization>, UserRepositoryError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        tables.check_constraints(draft, Some(id))?;

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.name = draft.name.as_str().to_owned();
        user.email = draft.email.as_str().to_owned();
        user.role = draft.role;
        user.organization_id = draft.organization_id;
        let updated = user.clone();

        Ok(tables.joined(&updated))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.lock().users.remove(&id).is_some())
    }
}
