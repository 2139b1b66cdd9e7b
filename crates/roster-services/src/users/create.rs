//! Create operation

use roster_db::CreateUserDto;
use roster_models::NewUser;
use tracing::{info, instrument, warn};

use super::utils::{normalize_roles, validate_login_uniqueness, validate_roles};
use super::UserService;
use crate::error::{UserError, UserResult};
use crate::result::CreateUserResult;

impl UserService {
    /// Create a user with at least one existing role and a free login
    #[instrument(name = "users.service.create", skip(self, new_user), fields(login = %new_user.login))]
    pub async fn create(&self, new_user: NewUser) -> UserResult<CreateUserResult> {
        info!("Creating new user");

        if new_user.roles.is_empty() {
            warn!("Rejected user without roles");
            return Err(UserError::NoRoles);
        }

        validate_roles(self.roles.as_ref(), &new_user.roles).await?;
        validate_login_uniqueness(self.users.as_ref(), &new_user.login, None).await?;

        let roles = normalize_roles(&new_user.roles);
        let dto = CreateUserDto {
            name: new_user.name,
            login: new_user.login,
            password: self.passwords.hash(&new_user.password)?,
            roles: roles.clone(),
        };

        let user = match self.users.create(dto).await {
            Ok(user) => user,
            Err(e) => return Err(self.write_error(e, None, &roles).await),
        };

        info!(user_id = user.id, "Successfully created user");
        Ok(CreateUserResult::new(user))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use roster_auth::PasswordStorage;
    use roster_db::{InMemoryStore, RepositoryError, UserRepository};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_create_user() {
        let store = store();
        let service = service(store.clone());

        let result = service.create(ivan()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.user.login, "ivan01");
        assert_eq!(store.role_ids(result.user.id).await.unwrap(), vec![1, 4]);
    }

    #[tokio::test]
    async fn test_create_dedups_roles() {
        let store = store();
        let service = service(store.clone());

        let user = service
            .create(NewUser {
                roles: vec![1, 1, 2, 4, 4],
                ..ivan()
            })
            .await
            .unwrap()
            .user;

        assert_eq!(store.role_ids(user.id).await.unwrap(), vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_create_requires_roles() {
        let store = store();
        let service = service(store.clone());

        let err = service
            .create(NewUser {
                roles: vec![],
                ..ivan()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NoRoles));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_roles() {
        let store = store();
        let service = service(store.clone());

        let err = service
            .create(NewUser {
                roles: vec![1, 9, 7, 9],
                ..ivan()
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Roles with ID 9, 7 do not exist");
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_taken_login() {
        let store = store();
        let service = service(store.clone());
        service.create(ivan()).await.unwrap();

        let err = service.create(ivan()).await.unwrap_err();
        assert!(matches!(err, UserError::LoginTaken));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_role_check_runs_before_login_check() {
        let service = service(store());
        service.create(ivan()).await.unwrap();

        let err = service
            .create(NewUser {
                roles: vec![8],
                ..ivan()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::RolesNotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let store = store();
        let service = service_with(store.clone(), PasswordStorage::Argon2);

        let user = service.create(ivan()).await.unwrap().user;
        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_ne!(stored.password, "Passw0rd");
        assert!(stored.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_unique_violation_on_write_is_login_taken() {
        let mut users = MockUsers::new();
        users.expect_find_by_login().returning(|_| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict("users_login_key".into())));

        let err = mocked(users, any_roles()).create(ivan()).await.unwrap_err();
        assert!(matches!(err, UserError::LoginTaken));
    }

    #[tokio::test]
    async fn test_role_refused_by_storage_is_a_rule_violation() {
        // The catalog vouches for every role but the store holds none.
        let service = mocked(InMemoryStore::new(), any_roles());

        let err = service.create(ivan()).await.unwrap_err();
        assert!(matches!(err, UserError::RolesRejected));
        assert!(err.is_rule_violation());
    }

    #[tokio::test]
    async fn test_role_deleted_between_check_and_write() {
        let calls = AtomicUsize::new(0);
        let mut roles = MockRoles::new();
        roles.expect_find_by_ids().returning(move |ids| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(ids.iter().copied().map(role).collect())
            } else {
                Ok(vec![role(1)])
            }
        });

        let mut users = MockUsers::new();
        users.expect_find_by_login().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(RepositoryError::Validation("user_roles_role_id_fkey".into())));

        let err = mocked(users, roles).create(ivan()).await.unwrap_err();
        match err {
            UserError::RolesNotFound { missing } => assert_eq!(missing, vec![4]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_storage_error_is_passed_through() {
        let mut users = MockUsers::new();
        users.expect_find_by_login().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));

        let err = mocked(users, any_roles()).create(ivan()).await.unwrap_err();
        assert!(matches!(
            err,
            UserError::Storage(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        ));
    }
}
