//! Response bodies of successful writes

use roster_models::User;
use serde::Serialize;

/// `{"success": true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResult {
    pub success: bool,
}

impl SuccessResult {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `{"success": true, "user": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserResult {
    pub success: bool,
    pub user: User,
}

impl CreateUserResult {
    pub fn new(user: User) -> Self {
        Self {
            success: true,
            user,
        }
    }
}
