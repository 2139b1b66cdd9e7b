//! # roster-api
//!
//! REST handlers for Roster.
//!
//! Five endpoints under `/users`. Path ids must be integers; bodies are run
//! through the payload contracts before the user service sees them.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
