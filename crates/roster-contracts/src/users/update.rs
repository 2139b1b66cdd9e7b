//! Update contract for users

use roster_core::result::ValidationResult;
use roster_models::UpdateUser;
use serde_json::Value;

use super::base::{Presence, UserFields};
use crate::base::{object, Contract};

/// Contract for a partial update: absent or null fields are left alone,
/// present ones obey the create rules
///
/// An update with no fields at all passes here; rejecting it is a
/// business rule checked after the user is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateUserContract;

impl Contract for UpdateUserContract {
    type Output = UpdateUser;

    fn validate(&self, body: &Value) -> ValidationResult<UpdateUser> {
        let fields = UserFields::read(object(body)?, Presence::Optional)?;

        Ok(UpdateUser {
            name: fields.name,
            login: fields.login,
            password: fields.password,
            roles: fields.roles,
        })
    }
}
