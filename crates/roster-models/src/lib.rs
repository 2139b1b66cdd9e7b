//! # roster-models
//!
//! Domain models for Roster: users, the roles they reference, and the
//! join records between them.

pub use roster_core::traits::{Id, Identifiable};

pub mod role;
pub mod user;

pub use role::{Role, UserRoleWithRole};
pub use user::{NewUser, UpdateUser, User, UserSummary, UserWithRoles};
