//! In-process store
//!
//! Implements both repository ports over maps behind one lock. It keeps the
//! same guarantees as the PostgreSQL schema: unique logins, role assignments
//! must reference existing roles, and multi-step writes are all-or-nothing.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use roster_core::pagination::Pagination;
use roster_core::traits::{Id, Identifiable};
use roster_models::{Role, User, UserRoleWithRole, UserSummary, UserWithRoles};

use crate::repository::{
    CreateUserDto, RepositoryError, RepositoryResult, RoleRepository, UpdateUserDto,
    UserRepository,
};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<Id, User>,
    roles: BTreeMap<Id, Role>,
    /// user id -> assigned role ids
    assignments: BTreeMap<Id, BTreeSet<Id>>,
    last_id: Id,
}

impl State {
    fn login_owner(&self, login: &str) -> Option<Id> {
        self.users
            .values()
            .find(|u| u.login == login)
            .map(Identifiable::id)
    }

    fn check_login_free(&self, login: &str, owner: Option<Id>) -> RepositoryResult<()> {
        match self.login_owner(login) {
            Some(id) if Some(id) != owner => Err(RepositoryError::Conflict(format!(
                "login {:?} already exists",
                login
            ))),
            _ => Ok(()),
        }
    }

    fn check_roles_exist(&self, roles: &[Id]) -> RepositoryResult<()> {
        match roles.iter().find(|id| !self.roles.contains_key(id)) {
            Some(id) => Err(RepositoryError::Validation(format!(
                "role {} does not exist",
                id
            ))),
            None => Ok(()),
        }
    }
}

/// Store used by tests and by `memory://` deployments
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let store = Self::new();
        for role in roles {
            store.insert_role(role);
        }
        store
    }

    /// Add or replace a role
    pub fn insert_role(&self, role: Role) {
        self.state.write().roles.insert(role.id(), role);
    }

    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self, pagination: Pagination) -> RepositoryResult<Vec<UserSummary>> {
        let state = self.state.read();
        let skip = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.limit).unwrap_or(0);

        Ok(state
            .users
            .values()
            .skip(skip)
            .take(take)
            .map(User::summary)
            .collect())
    }

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>> {
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn find_with_roles(&self, id: Id) -> RepositoryResult<Option<UserWithRoles>> {
        let state = self.state.read();
        let Some(user) = state.users.get(&id) else {
            return Ok(None);
        };

        let roles = state
            .assignments
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|role_id| state.roles.get(role_id))
            .map(|role| UserRoleWithRole {
                user_id: id,
                role_id: role.id,
                role: role.clone(),
            })
            .collect();

        Ok(Some(UserWithRoles {
            user: user.clone(),
            roles,
        }))
    }

    async fn find_by_login(&self, login: &str) -> RepositoryResult<Option<User>> {
        let state = self.state.read();
        Ok(state
            .login_owner(login)
            .and_then(|id| state.users.get(&id).cloned()))
    }

    async fn role_ids(&self, user_id: Id) -> RepositoryResult<Vec<Id>> {
        Ok(self
            .state
            .read()
            .assignments
            .get(&user_id)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn create(&self, dto: CreateUserDto) -> RepositoryResult<User> {
        let mut state = self.state.write();
        state.check_login_free(&dto.login, None)?;
        state.check_roles_exist(&dto.roles)?;

        state.last_id += 1;
        let user = User {
            id: state.last_id,
            name: dto.name,
            login: dto.login,
            password: dto.password,
        };

        state.users.insert(user.id, user.clone());
        state
            .assignments
            .insert(user.id, dto.roles.into_iter().collect());

        Ok(user)
    }

    async fn update(&self, id: Id, dto: UpdateUserDto) -> RepositoryResult<()> {
        let mut state = self.state.write();
        if !state.users.contains_key(&id) {
            return Err(RepositoryError::NotFound(format!(
                "User with id {} not found",
                id
            )));
        }
        if let Some(login) = &dto.login {
            state.check_login_free(login, Some(id))?;
        }
        if let Some(roles) = &dto.roles {
            state.check_roles_exist(roles)?;
        }

        if let Some(user) = state.users.get_mut(&id) {
            if let Some(name) = dto.name {
                user.name = name;
            }
            if let Some(login) = dto.login {
                user.login = login;
            }
            if let Some(password) = dto.password {
                user.password = password;
            }
        }
        if let Some(roles) = dto.roles {
            state.assignments.insert(id, roles.into_iter().collect());
        }

        Ok(())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let mut state = self.state.write();
        state.assignments.remove(&id);
        state
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("User with id {} not found", id)))
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_ids(&self, ids: &[Id]) -> RepositoryResult<Vec<Role>> {
        let state = self.state.read();
        let wanted: BTreeSet<Id> = ids.iter().copied().collect();

        Ok(wanted
            .iter()
            .filter_map(|id| state.roles.get(id).cloned())
            .collect())
    }
}
