//! User model
//!
//! Table: users

use roster_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

use crate::role::UserRoleWithRole;

/// User entity
///
/// `password` holds whatever the password storage policy produced and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,

    /// Display name
    pub name: String,

    /// Login name (unique)
    pub login: String,

    /// Stored password
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl Identifiable for User {
    fn id(&self) -> Id {
        self.id
    }
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            login: self.login.clone(),
        }
    }
}

/// List projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Id,
    pub name: String,
    pub login: String,
}

/// User with its role assignments expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<UserRoleWithRole>,
}

impl UserWithRoles {
    pub fn role_ids(&self) -> Vec<Id> {
        self.roles.iter().map(|r| r.role_id).collect()
    }
}

/// Validated create payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub login: String,
    pub password: String,
    pub roles: Vec<Id>,
}

/// Validated partial update payload; `None` means "leave as is"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<Id>>,
}

impl UpdateUser {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.login.is_none()
            && self.password.is_none()
            && self.roles.is_none()
    }
}
