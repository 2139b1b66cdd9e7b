//! Checks shared by the user operations

use std::collections::HashSet;

use roster_auth::PasswordService;
use roster_core::traits::Id;
use roster_db::{RoleRepository, UserRepository};
use roster_models::{UpdateUser, User};
use tracing::debug;

use crate::error::{UserError, UserResult};

/// Drop repeated role ids, keeping the first occurrence of each
pub fn normalize_roles(ids: &[Id]) -> Vec<Id> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Fails with every requested id that has no role behind it
pub async fn validate_roles(roles: &dyn RoleRepository, ids: &[Id]) -> UserResult<()> {
    let wanted = normalize_roles(ids);
    let found: HashSet<Id> = roles
        .find_by_ids(&wanted)
        .await?
        .into_iter()
        .map(|role| role.id)
        .collect();

    if found.len() == wanted.len() {
        return Ok(());
    }

    let missing: Vec<Id> = wanted.into_iter().filter(|id| !found.contains(id)).collect();
    debug!(?missing, "Unknown role ids");
    Err(UserError::RolesNotFound { missing })
}

/// Fails if `login` belongs to a user other than `exclude`
pub async fn validate_login_uniqueness(
    users: &dyn UserRepository,
    login: &str,
    exclude: Option<Id>,
) -> UserResult<()> {
    match users.find_by_login(login).await? {
        Some(owner) if Some(owner.id) != exclude => Err(UserError::LoginTaken),
        _ => Ok(()),
    }
}

/// Whether applying `update` would change anything
///
/// `new_roles` is the normalized role set and is only `Some` when the
/// update carries roles; an update without roles never counts as a role
/// change.
pub fn has_changes(
    user: &User,
    current_roles: &[Id],
    update: &UpdateUser,
    new_roles: Option<&[Id]>,
    passwords: &PasswordService,
) -> bool {
    let name_changed = update.name.as_ref().is_some_and(|name| *name != user.name);
    let login_changed = update
        .login
        .as_ref()
        .is_some_and(|login| *login != user.login);
    let password_changed = update
        .password
        .as_ref()
        .is_some_and(|password| !passwords.matches(password, &user.password));
    let roles_changed = new_roles.is_some_and(|roles| {
        roles.len() != current_roles.len() || roles.iter().any(|id| !current_roles.contains(id))
    });

    name_changed || login_changed || password_changed || roles_changed
}
