//! User repository
//!
//! Database operations for users and their role assignments.

use async_trait::async_trait;
use roster_core::pagination::Pagination;
use roster_core::traits::Id;
use roster_models::{Role, User, UserRoleWithRole, UserSummary, UserWithRoles};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::repository::{
    CreateUserDto, RepositoryError, RepositoryResult, UpdateUserDto, UserRepository,
};

/// User database entity
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            login: row.login,
            password: row.password,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct UserSummaryRow {
    id: i64,
    name: String,
    login: String,
}

/// One `user_roles` row joined with its role
#[derive(Debug, Clone, FromRow)]
struct AssignmentRow {
    user_id: i64,
    role_id: i64,
    name: String,
    description: Option<String>,
}

impl From<AssignmentRow> for UserRoleWithRole {
    fn from(row: AssignmentRow) -> Self {
        UserRoleWithRole {
            user_id: row.user_id,
            role_id: row.role_id,
            role: Role {
                id: row.role_id,
                name: row.name,
                description: row.description,
            },
        }
    }
}

/// User repository implementation
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_roles(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Id,
        roles: &[Id],
    ) -> RepositoryResult<()> {
        if roles.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, role_id FROM UNNEST($2::BIGINT[]) AS t(role_id)
            "#,
        )
        .bind(user_id)
        .bind(roles)
        .execute(&mut **tx)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, pagination: Pagination) -> RepositoryResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT id, name, login
            FROM users
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                id: row.id,
                name: row.name,
                login: row.login,
            })
            .collect())
    }

    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, login, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_with_roles(&self, id: Id) -> RepositoryResult<Option<UserWithRoles>> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT ur.user_id, ur.role_id, r.name, r.description
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY ur.role_id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserWithRoles {
            user,
            roles: roles.into_iter().map(UserRoleWithRole::from).collect(),
        }))
    }

    async fn find_by_login(&self, login: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, login, password
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn role_ids(&self, user_id: Id) -> RepositoryResult<Vec<Id>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT role_id FROM user_roles WHERE user_id = $1 ORDER BY role_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn create(&self, dto: CreateUserDto) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, login, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, login, password
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.login)
        .bind(&dto.password)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        Self::insert_roles(&mut tx, row.id, &dto.roles).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    async fn update(&self, id: Id, dto: UpdateUserDto) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE($1, name),
                login = COALESCE($2, login),
                password = COALESCE($3, password)
            WHERE id = $4
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.login)
        .bind(&dto.password)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "User with id {} not found",
                id
            )));
        }

        if let Some(roles) = &dto.roles {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_roles(&mut tx, id, roles).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "User with id {} not found",
                id
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}
