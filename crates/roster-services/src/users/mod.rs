//! User services
//!
//! `UserService` is split by operation: reads live here, writes in
//! `create`, `update` and `delete`.

mod create;
mod delete;
mod update;
pub mod utils;

use std::sync::Arc;

use roster_auth::PasswordService;
use roster_core::config::PaginationConfig;
use roster_core::pagination::PageRequest;
use roster_core::traits::Id;
use roster_db::{Repositories, RepositoryError, RoleRepository, UserRepository};
use roster_models::{UserSummary, UserWithRoles};
use tracing::{debug, instrument};

use crate::error::{UserError, UserResult};
use utils::validate_roles;

/// Domain service with the user management rules
///
/// Depends only on the repository ports, not on a concrete store.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    passwords: PasswordService,
    pagination: PaginationConfig,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        passwords: PasswordService,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            users,
            roles,
            passwords,
            pagination,
        }
    }

    pub fn from_repositories(
        repos: Repositories,
        passwords: PasswordService,
        pagination: PaginationConfig,
    ) -> Self {
        Self::new(repos.users, repos.roles, passwords, pagination)
    }

    #[instrument(name = "users.service.list", skip(self))]
    pub async fn list(&self, page: PageRequest) -> UserResult<Vec<UserSummary>> {
        let pagination = page.resolve(&self.pagination);
        let users = self.users.list(pagination).await?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(name = "users.service.get", skip(self), fields(user_id = id))]
    pub async fn get(&self, id: Id) -> UserResult<UserWithRoles> {
        let user = self
            .users
            .find_with_roles(id)
            .await?
            .ok_or(UserError::NotFound { id })?;

        debug!("Loaded user");
        Ok(user)
    }

    /// Map a failed write onto the rule it broke
    ///
    /// Storage constraints back up the checks made before the write: a
    /// unique violation is a taken login, a foreign-key violation a role
    /// that vanished after it was checked.
    async fn write_error(&self, err: RepositoryError, id: Option<Id>, roles: &[Id]) -> UserError {
        match (err, id) {
            (RepositoryError::Conflict(_), _) => UserError::LoginTaken,
            (RepositoryError::NotFound(_), Some(id)) => UserError::NotFound { id },
            (RepositoryError::Validation(_), _) => {
                match validate_roles(self.roles.as_ref(), roles).await {
                    Err(e) => e,
                    Ok(()) => UserError::RolesRejected,
                }
            }
            (e, _) => e.into(),
        }
    }
}
