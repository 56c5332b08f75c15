//! Recipe service
//!
//! Recipes are always loaded through their owner. Linked tags and
//! ingredients must belong to the same user as the recipe.

use crate::error::ApiError;
use crate::media::MediaStorage;
use crate::repositories::{
    AttributeKind, AttributeRecord, AttributeRepository, CreateRecipe, LinkedAttributeRecord,
    RecipeFilter, RecipeRecord, RecipeRepository, UpdateRecipe,
};
use crate::services::AttributeService;
use recipe_api_shared::models::{Ingredient, Recipe, Tag};
use recipe_api_shared::types::{CreateRecipeRequest, RecipeQuery, UpdateRecipeRequest};
use recipe_api_shared::validation::{self, ValidationError};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Parse a comma-separated list of ids, e.g. `?tags=<id>,<id>`
pub fn parse_id_list(field: &str, raw: Option<&str>) -> Result<Vec<Uuid>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part).map_err(|_| {
                ApiError::from(ValidationError::new(field, &format!("Invalid id: {}", part)))
            })
        })
        .collect()
}

fn validate_update(req: &UpdateRecipeRequest) -> Result<(), ValidationError> {
    if let Some(title) = &req.title {
        ValidationError::check("title", validation::validate_title(title))?;
    }
    if let Some(minutes) = req.time_minutes {
        ValidationError::check("time_minutes", validation::validate_time_minutes(minutes))?;
    }
    if let Some(price) = &req.price {
        ValidationError::check("price", validation::validate_price(price))?;
    }
    if let Some(link) = &req.link {
        ValidationError::check("link", validation::validate_link(link))?;
    }
    Ok(())
}

/// Group linked attributes by recipe id
fn group_by_recipe<T: From<AttributeRecord>>(
    linked: Vec<LinkedAttributeRecord>,
) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for record in linked {
        let recipe_id = record.recipe_id;
        grouped
            .entry(recipe_id)
            .or_default()
            .push(T::from(AttributeRecord::from(record)));
    }
    grouped
}

/// Recipe service for business logic
pub struct RecipeService;

impl RecipeService {
    /// List the user's recipes, optionally filtered by tag and ingredient ids
    pub async fn list_recipes(
        pool: &PgPool,
        user_id: Uuid,
        query: &RecipeQuery,
    ) -> Result<Vec<Recipe>, ApiError> {
        let filter = RecipeFilter {
            tag_ids: parse_id_list("tags", query.tags.as_deref())?,
            ingredient_ids: parse_id_list("ingredients", query.ingredients.as_deref())?,
        };

        let records = RecipeRepository::list_for_user(pool, user_id, &filter)
            .await
            .map_err(ApiError::Internal)?;

        Self::attach_relations(pool, records).await
    }

    /// Create a recipe owned by the user
    pub async fn create_recipe(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        let update = UpdateRecipeRequest::from(req);
        validate_update(&update)?;

        let tag_ids = AttributeService::ensure_owned(
            pool,
            AttributeKind::Tag,
            user_id,
            update.tags.as_deref().unwrap_or_default(),
        )
        .await?;
        let ingredient_ids = AttributeService::ensure_owned(
            pool,
            AttributeKind::Ingredient,
            user_id,
            update.ingredients.as_deref().unwrap_or_default(),
        )
        .await?;

        let input = CreateRecipe {
            user_id,
            title: update.title.unwrap_or_default().trim().to_string(),
            time_minutes: update.time_minutes.unwrap_or_default(),
            price: update.price.unwrap_or_default(),
            link: update.link.unwrap_or_default(),
            tag_ids,
            ingredient_ids,
        };

        let record = RecipeRepository::create(pool, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(recipe_id = %record.id, %user_id, "Recipe created");
        Self::load(pool, record).await
    }

    /// Get one of the user's recipes with its tags and ingredients
    pub async fn get_recipe(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Recipe, ApiError> {
        let record = RecipeRepository::find_by_id_and_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        Self::load(pool, record).await
    }

    /// Partially update a recipe; given tag/ingredient lists replace the links
    pub async fn update_recipe(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        validate_update(&req)?;

        let tag_ids = match &req.tags {
            Some(ids) => {
                Some(AttributeService::ensure_owned(pool, AttributeKind::Tag, user_id, ids).await?)
            }
            None => None,
        };
        let ingredient_ids = match &req.ingredients {
            Some(ids) => Some(
                AttributeService::ensure_owned(pool, AttributeKind::Ingredient, user_id, ids)
                    .await?,
            ),
            None => None,
        };

        let updates = UpdateRecipe {
            title: req.title.map(|t| t.trim().to_string()),
            time_minutes: req.time_minutes,
            price: req.price,
            link: req.link,
            tag_ids,
            ingredient_ids,
        };

        let record = RecipeRepository::update(pool, id, user_id, updates)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        Self::load(pool, record).await
    }

    /// Replace every field of a recipe
    pub async fn replace_recipe(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: CreateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        Self::update_recipe(pool, user_id, id, UpdateRecipeRequest::from(req)).await
    }

    /// Delete one of the user's recipes, removing its stored image
    pub async fn delete_recipe(
        pool: &PgPool,
        media: &MediaStorage,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let record = RecipeRepository::find_by_id_and_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        let deleted = RecipeRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Recipe not found".to_string()));
        }

        if let Some(image) = record.image {
            media.remove(&image).await;
        }
        info!(recipe_id = %id, %user_id, "Recipe deleted");
        Ok(())
    }

    /// Store an uploaded image for one of the user's recipes
    pub async fn upload_image(
        pool: &PgPool,
        media: &MediaStorage,
        user_id: Uuid,
        id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, ApiError> {
        // Check ownership before writing anything to disk
        RecipeRepository::find_by_id_and_user(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        let path = media
            .save_recipe_image(filename, bytes)
            .await
            .map_err(ApiError::Internal)?;

        let updated = RecipeRepository::set_image(pool, id, user_id, &path)
            .await
            .map_err(ApiError::Internal)?;

        match updated {
            Some((_, previous)) => {
                if let Some(previous) = previous {
                    media.remove(&previous).await;
                }
                info!(recipe_id = %id, image = %path, "Recipe image uploaded");
                Ok(path)
            }
            None => {
                media.remove(&path).await;
                Err(ApiError::NotFound("Recipe not found".to_string()))
            }
        }
    }

    async fn load(pool: &PgPool, record: RecipeRecord) -> Result<Recipe, ApiError> {
        Self::attach_relations(pool, vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Recipe vanished while loading")))
    }

    /// Load tags and ingredients for a batch of recipes in two queries
    async fn attach_relations(
        pool: &PgPool,
        records: Vec<RecipeRecord>,
    ) -> Result<Vec<Recipe>, ApiError> {
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

        let tags = AttributeRepository::list_for_recipes(pool, AttributeKind::Tag, &ids)
            .await
            .map_err(ApiError::Internal)?;
        let ingredients =
            AttributeRepository::list_for_recipes(pool, AttributeKind::Ingredient, &ids)
                .await
                .map_err(ApiError::Internal)?;

        let mut tags: HashMap<Uuid, Vec<Tag>> = group_by_recipe(tags);
        let mut ingredients: HashMap<Uuid, Vec<Ingredient>> = group_by_recipe(ingredients);

        Ok(records
            .into_iter()
            .map(|record| Recipe {
                tags: tags.remove(&record.id).unwrap_or_default(),
                ingredients: ingredients.remove(&record.id).unwrap_or_default(),
                id: record.id,
                user_id: record.user_id,
                title: record.title,
                time_minutes: record.time_minutes,
                price: record.price,
                link: record.link,
                image: record.image,
                created_at: record.created_at,
            })
            .collect())
    }
}
