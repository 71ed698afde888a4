//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage.
//! Each exposes a strongly typed error so adapters map their failures into
//! predictable variants. Driving ports (`*Query`, `*Command`) are the use
//! cases inbound adapters call; they speak [`crate::domain::Error`].

mod directory_stats_query;
mod macros;
mod organization_repository;
mod organizations;
mod user_repository;
mod users;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use directory_stats_query::MockDirectoryStatsQuery;
pub use directory_stats_query::{DirectoryStatsQuery, FixtureDirectoryStatsQuery};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::{OrganizationRepository, OrganizationRepositoryError};
pub use organizations::{
    FixtureOrganizationsCommand, FixtureOrganizationsQuery, OrganizationsCommand,
    OrganizationsQuery,
};
#[cfg(test)]
pub use organizations::{MockOrganizationsCommand, MockOrganizationsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
pub use users::{FixtureUsersCommand, FixtureUsersQuery, UsersCommand, UsersQuery};
#[cfg(test)]
pub use users::{MockUsersCommand, MockUsersQuery};
