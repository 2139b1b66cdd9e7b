//! Update operation

use roster_core::traits::Id;
use roster_db::UpdateUserDto;
use roster_models::UpdateUser;
use tracing::{info, instrument, warn};

use super::utils::{has_changes, normalize_roles, validate_login_uniqueness, validate_roles};
use super::UserService;
use crate::error::{UserError, UserResult};
use crate::result::SuccessResult;

impl UserService {
    /// Apply a partial update that actually changes something
    ///
    /// Checks run in order: user exists, some field supplied, login free,
    /// effective change, supplied roles exist.
    #[instrument(name = "users.service.update", skip(self, update), fields(user_id = id))]
    pub async fn update(&self, id: Id, update: UpdateUser) -> UserResult<SuccessResult> {
        info!("Updating user");

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound { id })?;
        let current_roles = self.users.role_ids(id).await?;

        if update.is_empty() {
            warn!("Rejected empty update");
            return Err(UserError::EmptyUpdate);
        }

        if let Some(login) = &update.login {
            validate_login_uniqueness(self.users.as_ref(), login, Some(id)).await?;
        }

        let new_roles = update.roles.as_deref().map(normalize_roles);
        if !has_changes(
            &user,
            &current_roles,
            &update,
            new_roles.as_deref(),
            &self.passwords,
        ) {
            warn!("Rejected update without effective change");
            return Err(UserError::NoChanges);
        }

        if let Some(roles) = new_roles.as_deref().filter(|roles| !roles.is_empty()) {
            validate_roles(self.roles.as_ref(), roles).await?;
        }

        let password = match &update.password {
            Some(password) => Some(self.passwords.hash(password)?),
            None => None,
        };

        let roles = new_roles.filter(|roles| !roles.is_empty());
        let dto = UpdateUserDto {
            name: update.name,
            login: update.login,
            password,
            roles: roles.clone(),
        };

        if let Err(e) = self.users.update(id, dto).await {
            let roles = roles.unwrap_or_default();
            return Err(self.write_error(e, Some(id), &roles).await);
        }

        info!("Successfully updated user");
        Ok(SuccessResult::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use roster_auth::PasswordStorage;
    use roster_db::{RepositoryError, UserRepository};
    use roster_models::NewUser;

    fn users_with_ivan() -> MockUsers {
        let mut users = MockUsers::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_ivan())));
        users.expect_role_ids().returning(|_| Ok(vec![1, 4]));
        users.expect_find_by_login().returning(|_| Ok(None));
        users
    }

    fn rename() -> UpdateUser {
        UpdateUser {
            name: Some("Petr".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_name() {
        let store = store();
        let service = service(store.clone());
        let id = service.create(ivan()).await.unwrap().user.id;

        let result = service
            .update(
                id,
                UpdateUser {
                    name: Some("Petr".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.success);
        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Petr");
        assert_eq!(stored.login, "ivan01");
        assert_eq!(store.role_ids(id).await.unwrap(), vec![1, 4]);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = service(store());
        let err = service
            .update(
                99999,
                UpdateUser {
                    name: Some("Ivan".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound { id: 99999 }));
    }

    #[tokio::test]
    async fn test_not_found_wins_over_empty_update() {
        let service = service(store());
        let err = service.update(5, UpdateUser::default()).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_update() {
        let service = service(store());
        let id = service.create(ivan()).await.unwrap().user.id;

        let err = service.update(id, UpdateUser::default()).await.unwrap_err();
        assert!(matches!(err, UserError::EmptyUpdate));
    }

    #[tokio::test]
    async fn test_identical_update_is_rejected_for_every_field() {
        let service = service(store());
        let id = service.create(ivan()).await.unwrap().user.id;

        let identical = [
            UpdateUser {
                name: Some("Ivan".into()),
                ..Default::default()
            },
            UpdateUser {
                login: Some("ivan01".into()),
                ..Default::default()
            },
            UpdateUser {
                password: Some("Passw0rd".into()),
                ..Default::default()
            },
            UpdateUser {
                roles: Some(vec![4, 1, 4]),
                ..Default::default()
            },
            UpdateUser {
                name: Some("Ivan".into()),
                login: Some("ivan01".into()),
                password: Some("Passw0rd".into()),
                roles: Some(vec![1, 4]),
            },
        ];

        for update in identical {
            let err = service.update(id, update).await.unwrap_err();
            assert!(matches!(err, UserError::NoChanges));
        }
    }

    #[tokio::test]
    async fn test_identical_password_under_argon2() {
        let service = service_with(store(), PasswordStorage::Argon2);
        let id = service.create(ivan()).await.unwrap().user.id;

        let err = service
            .update(
                id,
                UpdateUser {
                    password: Some("Passw0rd".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NoChanges));

        assert!(service
            .update(
                id,
                UpdateUser {
                    password: Some("Passw0rd2".into()),
                    ..Default::default()
                },
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_login_taken_by_another_user() {
        let service = service(store());
        service.create(ivan()).await.unwrap();
        let petr = service
            .create(NewUser {
                login: "petr".into(),
                ..ivan()
            })
            .await
            .unwrap()
            .user;

        let err = service
            .update(
                petr.id,
                UpdateUser {
                    login: Some("ivan01".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::LoginTaken));
    }

    #[tokio::test]
    async fn test_replace_roles() {
        let store = store();
        let service = service(store.clone());
        let id = service.create(ivan()).await.unwrap().user.id;

        service
            .update(
                id,
                UpdateUser {
                    roles: Some(vec![2, 2, 3]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(store.role_ids(id).await.unwrap(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_unknown_roles_on_update() {
        let store = store();
        let service = service(store.clone());
        let id = service.create(ivan()).await.unwrap().user.id;

        let err = service
            .update(
                id,
                UpdateUser {
                    roles: Some(vec![1, 42]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            UserError::RolesNotFound { missing } => assert_eq!(missing, vec![42]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(store.role_ids(id).await.unwrap(), vec![1, 4]);
    }

    #[tokio::test]
    async fn test_user_deleted_before_write_is_not_found() {
        let mut users = users_with_ivan();
        users
            .expect_update()
            .times(1)
            .returning(|id, _| Err(RepositoryError::NotFound(format!("User with id {id} not found"))));

        let err = mocked(users, any_roles()).update(1, rename()).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound { id: 1 }));
    }

    #[tokio::test]
    async fn test_unique_violation_on_update_is_login_taken() {
        let mut users = users_with_ivan();
        users
            .expect_update()
            .returning(|_, _| Err(RepositoryError::Conflict("users_login_key".into())));

        let update = UpdateUser {
            login: Some("petr".into()),
            ..Default::default()
        };
        let err = mocked(users, any_roles()).update(1, update).await.unwrap_err();
        assert!(matches!(err, UserError::LoginTaken));
    }

    #[tokio::test]
    async fn test_role_refused_on_update_is_a_rule_violation() {
        let mut users = users_with_ivan();
        users
            .expect_update()
            .returning(|_, _| Err(RepositoryError::Validation("user_roles_role_id_fkey".into())));

        let update = UpdateUser {
            roles: Some(vec![2]),
            ..Default::default()
        };
        let err = mocked(users, any_roles()).update(1, update).await.unwrap_err();
        assert!(matches!(err, UserError::RolesRejected));
    }
}
