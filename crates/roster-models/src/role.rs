//! Role model
//!
//! Table: roles. Roles are managed outside this service; users only
//! reference them by id.

use roster_core::config::SeedRole;
use roster_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

/// Named permission grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
}

impl Identifiable for Role {
    fn id(&self) -> Id {
        self.id
    }
}

impl From<&SeedRole> for Role {
    fn from(seed: &SeedRole) -> Self {
        Self {
            id: seed.id,
            name: seed.name.clone(),
            description: seed.description.clone(),
        }
    }
}

/// One `user_roles` row with its role expanded, as returned by the detail
/// endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleWithRole {
    pub user_id: Id,
    pub role_id: Id,
    pub role: Role,
}
