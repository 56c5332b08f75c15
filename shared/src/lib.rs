//! Recipe API Shared Library
//!
//! This crate contains the domain models, API types and validation
//! utilities shared by the backend and its tooling.

pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use models::{Ingredient, Recipe, Tag, User};
pub use types::*;
