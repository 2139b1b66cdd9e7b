//! Core traits shared by models and storage

/// Primary key type
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}
