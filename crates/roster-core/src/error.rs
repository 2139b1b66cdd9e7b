//! Core error types for Roster
//!
//! Every layer reports into `RosterError`; HTTP status mapping lives here so
//! the API crate and the server agree on it.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for all Roster operations
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RosterError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        RosterError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// A validation failure carrying one message not tied to a field
    pub fn rule(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        RosterError::Validation(errors)
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RosterError::NotFound { .. } => 404,
            RosterError::Validation(_) => 400,
            RosterError::Unexpected(_) | RosterError::Config(_) => 500,
        }
    }
}

/// Validation errors collection, keyed by field
///
/// Fields are kept in a `BTreeMap` so the rendered message list is stable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let messages = self.errors.entry(field.into()).or_default();
        let message = message.into();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Messages as shown to API clients, base errors first
    pub fn messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for field_messages in self.errors.values() {
            messages.extend(field_messages.iter().cloned());
        }
        messages
    }

    /// Messages prefixed with their field name, for logs
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{}: {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
