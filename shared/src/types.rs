//! API request and response types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ingredient, Recipe, Tag};

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update, absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ============================================================================
// Tags and Ingredients
// ============================================================================

/// Query parameters shared by the tag and ingredient list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignedOnlyQuery {
    /// `1` restricts results to records linked to at least one recipe
    #[serde(default)]
    pub assigned_only: u8,
}

impl AssignedOnlyQuery {
    #[inline]
    pub fn is_assigned_only(&self) -> bool {
        self.assigned_only != 0
    }
}

/// Create tag request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: String,
}

/// Create ingredient request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIngredientRequest {
    #[serde(default)]
    pub name: String,
}

/// Tag response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Ingredient response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// Recipe list filters: comma-separated tag and ingredient ids
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
}

/// Create (or fully replace) a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    #[serde(default)]
    pub ingredients: Vec<Uuid>,
}

/// Partial recipe update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Replaces the linked tags when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Uuid>>,
    /// Replaces the linked ingredients when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Uuid>>,
}

impl From<CreateRecipeRequest> for UpdateRecipeRequest {
    fn from(req: CreateRecipeRequest) -> Self {
        Self {
            title: Some(req.title),
            time_minutes: Some(req.time_minutes),
            price: Some(req.price),
            link: Some(req.link),
            tags: Some(req.tags),
            ingredients: Some(req.ingredients),
        }
    }
}

/// Recipe list item, relations as ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<Uuid>,
    pub image: Option<String>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: recipe.tags.iter().map(|t| t.id).collect(),
            ingredients: recipe.ingredients.iter().map(|i| i.id).collect(),
            image: recipe.image,
        }
    }
}

/// Recipe detail, relations nested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<IngredientResponse>,
    pub image: Option<String>,
}

impl From<Recipe> for RecipeDetailResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(IngredientResponse::from)
                .collect(),
            image: recipe.image,
        }
    }
}

/// Response after a recipe image upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeImageResponse {
    pub id: Uuid,
    pub image: String,
}
