//! Delete operation

use roster_core::traits::Id;
use tracing::{error, info, instrument};

use super::UserService;
use crate::error::{UserError, UserResult};
use crate::result::SuccessResult;

impl UserService {
    /// Remove a user together with its role assignments
    #[instrument(name = "users.service.delete", skip(self), fields(user_id = id))]
    pub async fn delete(&self, id: Id) -> UserResult<SuccessResult> {
        info!("Deleting user");

        let result = self.remove(id).await;
        if let Err(e) = &result {
            if !matches!(e, UserError::NotFound { .. }) {
                error!(error = %e, "Failed to delete user");
            }
        }
        result
    }

    async fn remove(&self, id: Id) -> UserResult<SuccessResult> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound { id });
        }

        if let Err(e) = self.users.delete(id).await {
            return Err(self.write_error(e, Some(id), &[]).await);
        }

        info!("Successfully deleted user");
        Ok(SuccessResult::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use roster_db::{RepositoryError, UserRepository};

    fn users_with_ivan() -> MockUsers {
        let mut users = MockUsers::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_ivan())));
        users
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = store();
        let service = service(store.clone());
        let id = service.create(ivan()).await.unwrap().user.id;

        let result = service.delete(id).await.unwrap();
        assert!(result.success);

        assert!(matches!(
            service.get(id).await,
            Err(UserError::NotFound { .. })
        ));
        assert!(store.role_ids(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let service = service(store());
        assert!(matches!(
            service.delete(99999).await,
            Err(UserError::NotFound { id: 99999 })
        ));
    }

    #[tokio::test]
    async fn test_login_is_free_after_delete() {
        let service = service(store());
        let id = service.create(ivan()).await.unwrap().user.id;
        service.delete(id).await.unwrap();

        assert!(service.create(ivan()).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_delete_is_not_found() {
        let mut users = users_with_ivan();
        users
            .expect_delete()
            .times(1)
            .returning(|id| Err(RepositoryError::NotFound(format!("User with id {id} not found"))));

        let err = mocked(users, MockRoles::new()).delete(1).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound { id: 1 }));
    }

    #[tokio::test]
    async fn test_storage_failure_is_returned_unchanged() {
        let mut users = users_with_ivan();
        users
            .expect_delete()
            .times(1)
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));

        let err = mocked(users, MockRoles::new()).delete(1).await.unwrap_err();
        assert!(matches!(
            err,
            UserError::Storage(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        ));
        assert!(!err.is_rule_violation());
    }
}
