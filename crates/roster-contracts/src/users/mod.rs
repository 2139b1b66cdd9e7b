//! User contracts

mod base;
mod create;
mod update;

pub use base::{messages, UserFields};
pub use create::CreateUserContract;
pub use update::UpdateUserContract;
