//! Database repositories
//!
//! Provides data access layer for database operations. Every query on
//! tags, ingredients and recipes is scoped by the owning user's id.

pub mod attributes;
pub mod recipe;
pub mod user;

pub use attributes::{AttributeKind, AttributeRecord, AttributeRepository, LinkedAttributeRecord};
pub use recipe::{CreateRecipe, RecipeFilter, RecipeRecord, RecipeRepository, UpdateRecipe};
pub use user::{CreateUser, UpdateUser, UserRecord, UserRepository};
