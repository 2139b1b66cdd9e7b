//! # roster-db
//!
//! Database layer for Roster.
//!
//! - Connection pool management and embedded migrations
//! - Repository ports used by the service layer
//! - PostgreSQL repositories for users and roles
//! - An in-process store implementing the same ports
//!
//! ## Example
//!
//! ```ignore
//! use roster_db::{Database, Repositories};
//!
//! let db = Database::connect(&config.database).await?;
//! db.migrate().await?;
//!
//! let repos = Repositories::postgres(&db);
//! let user = repos.users.find_by_id(1).await?;
//! ```

use std::sync::Arc;

pub mod memory;
pub mod pool;
pub mod repository;
pub mod roles;
pub mod users;

// Re-exports
pub use memory::InMemoryStore;
pub use pool::{Database, PoolStats};
pub use repository::{
    CreateUserDto, RepositoryError, RepositoryResult, RoleRepository, UpdateUserDto,
    UserRepository,
};
pub use roles::PgRoleRepository;
pub use roster_core::pagination::Pagination;
pub use users::PgUserRepository;

/// The pair of repositories the user service needs
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.pool().clone())),
            roles: Arc::new(PgRoleRepository::new(db.pool().clone())),
        }
    }

    pub fn memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            roles: store,
        }
    }
}
