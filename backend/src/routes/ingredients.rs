//! Ingredient routes

use super::extract::{ApiJson, ApiQuery};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::AttributeService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use recipe_api_shared::types::{AssignedOnlyQuery, CreateIngredientRequest, IngredientResponse};

/// Create ingredient routes
pub fn ingredient_routes() -> Router<AppState> {
    Router::new().route("/", get(list_ingredients).post(create_ingredient))
}

/// GET /api/v1/recipe/ingredients - List the user's ingredients, name descending
async fn list_ingredients(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<AssignedOnlyQuery>,
) -> ApiResult<Json<Vec<IngredientResponse>>> {
    let ingredients =
        AttributeService::list_ingredients(state.db(), auth.user_id, query.is_assigned_only())
            .await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// POST /api/v1/recipe/ingredients
async fn create_ingredient(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateIngredientRequest>,
) -> ApiResult<(StatusCode, Json<IngredientResponse>)> {
    let ingredient =
        AttributeService::create_ingredient(state.db(), auth.user_id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}
