//! Tag routes

use super::extract::{ApiJson, ApiQuery};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::AttributeService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use recipe_api_shared::types::{AssignedOnlyQuery, CreateTagRequest, TagResponse};

/// Create tag routes
pub fn tag_routes() -> Router<AppState> {
    Router::new().route("/", get(list_tags).post(create_tag))
}

/// GET /api/v1/recipe/tags - List the user's tags
///
/// `?assigned_only=1` keeps only tags attached to one of the user's recipes.
async fn list_tags(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<AssignedOnlyQuery>,
) -> ApiResult<Json<Vec<TagResponse>>> {
    let tags =
        AttributeService::list_tags(state.db(), auth.user_id, query.is_assigned_only()).await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// POST /api/v1/recipe/tags
async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<TagResponse>)> {
    let tag = AttributeService::create_tag(state.db(), auth.user_id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}
