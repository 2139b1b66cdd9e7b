//! Repository ports
//!
//! The service layer depends on these traits only; `users`/`roles` hold the
//! PostgreSQL implementations and `memory` the in-process one.

use async_trait::async_trait;
use roster_core::pagination::Pagination;
use roster_core::traits::Id;
use roster_models::{Role, User, UserSummary, UserWithRoles};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Sort a write failure into conflict / validation / database
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return RepositoryError::Conflict(db.message().to_string());
            }
            if db.is_foreign_key_violation() {
                return RepositoryError::Validation(db.message().to_string());
            }
        }
        RepositoryError::Database(err)
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// DTO for creating a user; `password` is already in stored form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserDto {
    pub name: String,
    pub login: String,
    pub password: String,
    /// Normalized role ids
    pub roles: Vec<Id>,
}

/// DTO for updating a user; only `Some` fields are written
///
/// `roles`, when present, replaces the whole assignment set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<Id>>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// One page of users ordered by id
    async fn list(&self, pagination: Pagination) -> RepositoryResult<Vec<UserSummary>>;

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>>;

    /// The user with each role assignment expanded
    async fn find_with_roles(&self, id: Id) -> RepositoryResult<Option<UserWithRoles>>;

    async fn find_by_login(&self, login: &str) -> RepositoryResult<Option<User>>;

    /// Role ids currently assigned to a user
    async fn role_ids(&self, user_id: Id) -> RepositoryResult<Vec<Id>>;

    /// Insert the user and its role assignments atomically
    async fn create(&self, dto: CreateUserDto) -> RepositoryResult<User>;

    /// Apply a partial update atomically
    async fn update(&self, id: Id, dto: UpdateUserDto) -> RepositoryResult<()>;

    /// Remove the user's role assignments, then the user, atomically
    async fn delete(&self, id: Id) -> RepositoryResult<()>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Every role whose id is in `ids`; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[Id]) -> RepositoryResult<Vec<Role>>;
}
