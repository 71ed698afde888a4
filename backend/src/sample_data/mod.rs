//! Sample organizations and users for demos and local development.
//!
//! Records are written through the driving ports so they pass the same
//! validation and uniqueness rules as API traffic.

mod startup;

use std::sync::Arc;

use thiserror::Error;

use crate::domain::ports::{DirectoryStatsQuery, OrganizationsCommand, UsersCommand};
use crate::domain::{Error, OrganizationInput, UserInput};

pub use startup::seed_sample_data_on_startup;

struct SampleUser {
    name: &'static str,
    email: &'static str,
    role: &'static str,
}

struct SampleOrganization {
    name: &'static str,
    address: &'static str,
    users: [SampleUser; 2],
}

const SAMPLE_ORGANIZATIONS: [SampleOrganization; 3] = [
    SampleOrganization {
        name: "Tech Solutions Inc.",
        address: "123 Tech Street, Silicon Valley, CA 94000",
        users: [
            SampleUser {
                name: "John Smith",
                email: "john.smith@techsolutions.com",
                role: "Admin",
            },
            SampleUser {
                name: "Sarah Johnson",
                email: "sarah.johnson@techsolutions.com",
                role: "Member",
            },
        ],
    },
    SampleOrganization {
        name: "Digital Innovations Ltd.",
        address: "456 Innovation Drive, Austin, TX 78701",
        users: [
            SampleUser {
                name: "Mike Davis",
                email: "mike.davis@digitalinnovations.com",
                role: "Admin",
            },
            SampleUser {
                name: "Emily Brown",
                email: "emily.brown@digitalinnovations.com",
                role: "Member",
            },
        ],
    },
    SampleOrganization {
        name: "Future Systems Corp.",
        address: "789 Future Avenue, Seattle, WA 98101",
        users: [
            SampleUser {
                name: "David Wilson",
                email: "david.wilson@futuresystems.com",
                role: "Admin",
            },
            SampleUser {
                name: "Lisa Anderson",
                email: "lisa.anderson@futuresystems.com",
                role: "Member",
            },
        ],
    },
];

/// Failure while seeding sample data.
#[derive(Debug, Error)]
pub enum SampleDataError {
    /// Counting existing records failed.
    #[error("failed to inspect directory before seeding: {0}")]
    Inspect(#[source] Error),
    /// Creating a sample record was rejected.
    #[error("failed to create sample {record} `{name}`: {source}")]
    Create {
        record: &'static str,
        name: &'static str,
        #[source]
        source: Error,
    },
}

/// What a seeding attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and the sample records were inserted.
    Applied { organizations: usize, users: usize },
    /// The store already held data; nothing was written.
    AlreadyPopulated { organizations: usize, users: usize },
}

/// Inserts the sample catalogue through the domain commands.
#[derive(Clone)]
pub struct SampleDataSeeder {
    stats: Arc<dyn DirectoryStatsQuery>,
    organizations: Arc<dyn OrganizationsCommand>,
    users: Arc<dyn UsersCommand>,
}

impl SampleDataSeeder {
    pub fn new(
        stats: Arc<dyn DirectoryStatsQuery>,
        organizations: Arc<dyn OrganizationsCommand>,
        users: Arc<dyn UsersCommand>,
    ) -> Self {
        Self {
            stats,
            organizations,
            users,
        }
    }

    /// Seed only when the store has neither organizations nor users.
    ///
    /// # Errors
    ///
    /// Returns [`SampleDataError`] when the store cannot be inspected or a
    /// sample record is rejected. Records created before the failure stay.
    pub async fn seed_if_empty(&self) -> Result<SeedOutcome, SampleDataError> {
        let stats = self
            .stats
            .directory_stats()
            .await
            .map_err(SampleDataError::Inspect)?;
        if stats.total_organizations > 0 || stats.total_users > 0 {
            return Ok(SeedOutcome::AlreadyPopulated {
                organizations: stats.total_organizations,
                users: stats.total_users,
            });
        }

        let mut organizations = 0;
        let mut users = 0;
        for sample in &SAMPLE_ORGANIZATIONS {
            let organization = self
                .organizations
                .create_organization(OrganizationInput {
                    name: Some(sample.name.to_owned()),
                    address: Some(sample.address.to_owned()),
                })
                .await
                .map_err(|source| SampleDataError::Create {
                    record: "organization",
                    name: sample.name,
                    source,
                })?;
            organizations += 1;

            for user in &sample.users {
                self.users
                    .create_user(UserInput {
                        name: Some(user.name.to_owned()),
                        email: Some(user.email.to_owned()),
                        role: Some(user.role.to_owned()),
                        organization_id: Some(organization.id.get().to_string()),
                    })
                    .await
                    .map_err(|source| SampleDataError::Create {
                        record: "user",
                        name: user.name,
                        source,
                    })?;
                users += 1;
            }
        }

        Ok(SeedOutcome::Applied {
            organizations,
            users,
        })
    }
}
