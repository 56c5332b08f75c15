//! Business logic services
//!
//! Services validate input, enforce per-user ownership and coordinate
//! repositories and media storage.

pub mod attributes;
pub mod recipe;
pub mod user;

pub use attributes::AttributeService;
pub use recipe::RecipeService;
pub use user::{AccountRole, UserService};
