//! # roster-services
//!
//! Business logic services for Roster.
//!
//! `UserService` enforces the user rules (role existence, login uniqueness,
//! at least one role, no-op update rejection) before anything is written.

pub mod error;
pub mod result;
pub mod users;

pub use error::{UserError, UserResult};
pub use result::{CreateUserResult, SuccessResult};
pub use users::UserService;
