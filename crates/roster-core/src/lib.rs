//! # roster-core
//!
//! Core types, traits, and utilities for Roster.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - The error taxonomy and field-keyed validation errors
//! - Result type aliases
//! - The `Identifiable` trait and primary key type
//! - Page request types
//! - Application configuration

pub mod config;
pub mod error;
pub mod pagination;
pub mod result;
pub mod traits;

pub use error::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
