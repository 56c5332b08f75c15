//! Recipe API routes

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use recipe_api_shared::types::{
    CreateRecipeRequest, RecipeDetailResponse, RecipeImageResponse, RecipeQuery, RecipeResponse,
    UpdateRecipeRequest,
};
use uuid::Uuid;

/// Multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "image";

/// Create recipe routes
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route(
            "/:id",
            get(get_recipe)
                .put(replace_recipe)
                .patch(update_recipe)
                .delete(delete_recipe),
        )
        .route("/:id/upload-image", post(upload_image))
}

/// GET /api/v1/recipe/recipes - List the user's recipes, newest first
///
/// Filters: `?tags=<id>,<id>` and `?ingredients=<id>,<id>`.
async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<RecipeQuery>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let recipes = RecipeService::list_recipes(state.db(), auth.user_id, &query).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

/// POST /api/v1/recipe/recipes
async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateRecipeRequest>,
) -> ApiResult<(StatusCode, Json<RecipeDetailResponse>)> {
    let recipe = RecipeService::create_recipe(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

/// GET /api/v1/recipe/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let recipe = RecipeService::get_recipe(state.db(), auth.user_id, id).await?;
    Ok(Json(recipe.into()))
}

/// PUT /api/v1/recipe/recipes/:id - Full update
async fn replace_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateRecipeRequest>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let recipe = RecipeService::replace_recipe(state.db(), auth.user_id, id, req).await?;
    Ok(Json(recipe.into()))
}

/// PATCH /api/v1/recipe/recipes/:id - Partial update
async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateRecipeRequest>,
) -> ApiResult<Json<RecipeDetailResponse>> {
    let recipe = RecipeService::update_recipe(state.db(), auth.user_id, id, req).await?;
    Ok(Json(recipe.into()))
}

/// DELETE /api/v1/recipe/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    RecipeService::delete_recipe(state.db(), state.media(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/recipe/recipes/:id/upload-image
///
/// Expects a multipart form with the file in the `image` field.
async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<RecipeImageResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            break;
        }

        let image = RecipeService::upload_image(
            state.db(),
            state.media(),
            auth.user_id,
            id,
            &filename,
            &bytes,
        )
        .await?;
        return Ok(Json(RecipeImageResponse { id, image }));
    }

    Err(ApiError::FieldValidation {
        field: IMAGE_FIELD.to_string(),
        message: "No image file was submitted".to_string(),
    })
}
