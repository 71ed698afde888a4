//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DirectoryStatsQuery, FixtureDirectoryStatsQuery, FixtureOrganizationsCommand,
    FixtureOrganizationsQuery, FixtureUsersCommand, FixtureUsersQuery, OrganizationsCommand,
    OrganizationsQuery, UsersCommand, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub organizations: Arc<dyn OrganizationsCommand>,
    pub organizations_query: Arc<dyn OrganizationsQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub stats: Arc<dyn DirectoryStatsQuery>,
}

impl HttpState {
    /// State backed entirely by fixture ports.
    ///
    /// # Examples
    /// ```
    /// use orgdirectory::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixtures();
    /// let _users = state.users_query.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            organizations: Arc::new(FixtureOrganizationsCommand),
            organizations_query: Arc::new(FixtureOrganizationsQuery),
            users: Arc::new(FixtureUsersCommand),
            users_query: Arc::new(FixtureUsersQuery),
            stats: Arc::new(FixtureDirectoryStatsQuery),
        }
    }
}
