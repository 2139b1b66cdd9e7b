//! Role repository
//!
//! Read-only access to roles; roles are created and edited elsewhere.

use async_trait::async_trait;
use roster_core::traits::Id;
use roster_models::Role;
use sqlx::{FromRow, PgPool};

use crate::repository::{RepositoryResult, RoleRepository};

/// Role database entity
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_ids(&self, ids: &[Id]) -> RepositoryResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description
            FROM roles
            WHERE id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Role::from).collect())
    }
}
