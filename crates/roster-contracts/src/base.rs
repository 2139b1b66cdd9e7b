//! Base contract system

use roster_core::error::ValidationErrors;
use roster_core::result::ValidationResult;
use serde_json::{Map, Value};

/// Turns a raw request body into a validated payload
pub trait Contract: Send + Sync {
    type Output;

    fn validate(&self, body: &Value) -> ValidationResult<Self::Output>;
}

pub const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";

/// The body as a JSON object, or a base error
pub fn object(body: &Value) -> ValidationResult<&Map<String, Value>> {
    body.as_object().ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add_base(BODY_NOT_OBJECT);
        errors
    })
}

/// Copy `validator` failures into `errors`, keeping each rule's message
pub fn collect(errors: &mut ValidationErrors, report: validator::ValidationErrors) {
    for (field, failures) in report.field_errors() {
        for failure in failures {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| failure.code.to_string());
            errors.add(field, message);
        }
    }
}
