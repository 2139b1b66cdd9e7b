//! Create contract for users

use roster_core::error::ValidationErrors;
use roster_core::result::ValidationResult;
use roster_models::NewUser;
use serde_json::Value;

use super::base::{Presence, UserFields};
use crate::base::{object, Contract};

/// Contract for creating a new user: all four fields are required
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateUserContract;

impl Contract for CreateUserContract {
    type Output = NewUser;

    fn validate(&self, body: &Value) -> ValidationResult<NewUser> {
        let fields = UserFields::read(object(body)?, Presence::Required)?;

        match fields {
            UserFields {
                name: Some(name),
                login: Some(login),
                password: Some(password),
                roles: Some(roles),
            } => Ok(NewUser {
                name,
                login,
                password,
                roles,
            }),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add_base("Missing required fields");
                Err(errors)
            }
        }
    }
}
