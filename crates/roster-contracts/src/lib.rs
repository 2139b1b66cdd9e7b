//! # roster-contracts
//!
//! Payload contracts for Roster.
//!
//! A contract takes a raw JSON body and either produces a typed payload or
//! the full list of field errors. Shape checks (is this a string, is this an
//! array of integers) run on `serde_json::Value`; content rules run through
//! `validator` on the typed fields.

pub mod base;
pub mod users;

pub use base::*;
