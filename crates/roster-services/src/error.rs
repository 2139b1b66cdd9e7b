//! User service errors

use roster_auth::PasswordError;
use roster_core::error::RosterError;
use roster_core::traits::Id;
use roster_db::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User must have at least one role assigned")]
    NoRoles,

    #[error("At least one field must be supplied for update")]
    EmptyUpdate,

    #[error("Data matches the current values, no effective change found")]
    NoChanges,

    #[error("Login is already taken by another user")]
    LoginTaken,

    #[error("Roles with ID {} do not exist", join_ids(.missing))]
    RolesNotFound { missing: Vec<Id> },

    /// Storage refused a role reference that had passed the existence check
    #[error("One or more assigned roles do not exist")]
    RolesRejected,

    #[error("User not found")]
    NotFound { id: Id },

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

pub type UserResult<T> = Result<T, UserError>;

fn join_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(Id::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl UserError {
    /// A client-correctable rule violation, as opposed to a missing user or
    /// an infrastructure failure
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            UserError::NoRoles
                | UserError::EmptyUpdate
                | UserError::NoChanges
                | UserError::LoginTaken
                | UserError::RolesNotFound { .. }
                | UserError::RolesRejected
        )
    }
}

impl From<UserError> for RosterError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound { id } => RosterError::not_found("User", "id", id),
            e if e.is_rule_violation() => RosterError::rule(e.to_string()),
            e => RosterError::Unexpected(e.to_string()),
        }
    }
}
