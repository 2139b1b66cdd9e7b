//! Field rules shared by the user contracts

use once_cell::sync::Lazy;
use regex::Regex;
use roster_core::error::ValidationErrors;
use roster_core::traits::Id;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::base::collect;

/// Client-facing messages, one per rule
pub mod messages {
    pub const NAME_NOT_STRING: &str = "Name must be a string";
    pub const NAME_EMPTY: &str = "Name must not be empty";
    pub const LOGIN_NOT_STRING: &str = "Login must be a string";
    pub const LOGIN_EMPTY: &str = "Login must not be empty";
    pub const PASSWORD_NOT_STRING: &str = "Password must be a string";
    pub const PASSWORD_EMPTY: &str = "Password must not be empty";
    pub const PASSWORD_WEAK: &str =
        "Password must contain at least one uppercase letter and one digit";
    pub const ROLES_NOT_ARRAY: &str = "Role IDs must be an array";
    pub const ROLES_EMPTY: &str = "Roles array must not be empty";
    pub const ROLE_NOT_NUMBER: &str = "Each role ID must be a number";
}

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    if UPPERCASE.is_match(password) && DIGIT.is_match(password) {
        return Ok(());
    }
    let mut error = ValidationError::new("password_complexity");
    error.message = Some(messages::PASSWORD_WEAK.into());
    Err(error)
}

/// Typed user fields after the shape check; `None` fields are skipped by
/// the content rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UserFields {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Login must not be empty"))]
    pub login: Option<String>,

    #[validate(
        length(min = 1, message = "Password must not be empty"),
        custom = "validate_password_complexity"
    )]
    pub password: Option<String>,

    #[validate(length(min = 1, message = "Roles array must not be empty"))]
    pub roles: Option<Vec<Id>>,
}

/// Whether an absent or null field is itself an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    Optional,
}

struct StringRule {
    field: &'static str,
    not_string: &'static str,
    empty: &'static str,
    pattern: Option<&'static str>,
}

const NAME: StringRule = StringRule {
    field: "name",
    not_string: messages::NAME_NOT_STRING,
    empty: messages::NAME_EMPTY,
    pattern: None,
};

const LOGIN: StringRule = StringRule {
    field: "login",
    not_string: messages::LOGIN_NOT_STRING,
    empty: messages::LOGIN_EMPTY,
    pattern: None,
};

const PASSWORD: StringRule = StringRule {
    field: "password",
    not_string: messages::PASSWORD_NOT_STRING,
    empty: messages::PASSWORD_EMPTY,
    pattern: Some(messages::PASSWORD_WEAK),
};

impl UserFields {
    /// Shape check followed by the content rules
    pub(crate) fn read(
        body: &Map<String, Value>,
        presence: Presence,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let fields = UserFields {
            name: read_string(body, &NAME, presence, &mut errors),
            login: read_string(body, &LOGIN, presence, &mut errors),
            password: read_string(body, &PASSWORD, presence, &mut errors),
            roles: read_roles(body, presence, &mut errors),
        };

        if let Err(report) = fields.validate() {
            collect(&mut errors, report);
        }

        errors.into_result().map(|()| fields)
    }
}

fn read_string(
    body: &Map<String, Value>,
    rule: &StringRule,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match body.get(rule.field) {
        Some(Value::String(value)) => Some(value.clone()),
        None | Some(Value::Null) => {
            if presence == Presence::Required {
                errors.add(rule.field, rule.not_string);
                errors.add(rule.field, rule.empty);
                if let Some(pattern) = rule.pattern {
                    errors.add(rule.field, pattern);
                }
            }
            None
        }
        Some(_) => {
            errors.add(rule.field, rule.not_string);
            if let Some(pattern) = rule.pattern {
                errors.add(rule.field, pattern);
            }
            None
        }
    }
}

/// Role ids must be JSON integers
///
/// `as_i64` also turns away integral floats such as `1.0` or `1e3`, so an id
/// is never silently truncated or rounded.
fn read_roles(
    body: &Map<String, Value>,
    presence: Presence,
    errors: &mut ValidationErrors,
) -> Option<Vec<Id>> {
    match body.get("roles") {
        Some(Value::Array(items)) => {
            let ids: Option<Vec<Id>> = items.iter().map(Value::as_i64).collect();
            if ids.is_none() {
                errors.add("roles", messages::ROLE_NOT_NUMBER);
            }
            ids
        }
        None | Some(Value::Null) if presence == Presence::Optional => None,
        _ => {
            errors.add("roles", messages::ROLES_NOT_ARRAY);
            errors.add("roles", messages::ROLES_EMPTY);
            errors.add("roles", messages::ROLE_NOT_NUMBER);
            None
        }
    }
}
