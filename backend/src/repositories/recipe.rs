//! Recipe repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::attributes::{AttributeKind, AttributeRepository};

/// Recipe row, without relations
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a recipe
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tag_ids: Vec<Uuid>,
    pub ingredient_ids: Vec<Uuid>,
}

/// Input for updating a recipe, `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub ingredient_ids: Option<Vec<Uuid>>,
}

/// Recipe list filters; an empty list means "no filter"
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub tag_ids: Vec<Uuid>,
    pub ingredient_ids: Vec<Uuid>,
}

/// Recipe repository
pub struct RecipeRepository;

impl RecipeRepository {
    /// Create a recipe and its tag/ingredient links in one transaction
    pub async fn create(pool: &PgPool, input: CreateRecipe) -> Result<RecipeRecord> {
        let mut tx = pool.begin().await?;

        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.title)
        .bind(input.time_minutes)
        .bind(input.price)
        .bind(&input.link)
        .fetch_one(&mut *tx)
        .await?;

        AttributeRepository::set_recipe_links(&mut *tx, AttributeKind::Tag, recipe.id, &input.tag_ids)
            .await?;
        AttributeRepository::set_recipe_links(
            &mut *tx,
            AttributeKind::Ingredient,
            recipe.id,
            &input.ingredient_ids,
        )
        .await?;

        tx.commit().await?;

        Ok(recipe)
    }

    /// Find a recipe by ID, scoped to its owner
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RecipeRecord>> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// List a user's recipes, newest first.
    ///
    /// A recipe matches a non-empty id filter when it links any of the ids;
    /// the tag and ingredient filters are combined with AND.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<RecipeRecord>> {
        let recipes = sqlx::query_as::<_, RecipeRecord>(
            r#"
            SELECT r.id, r.user_id, r.title, r.time_minutes, r.price, r.link, r.image,
                   r.created_at, r.updated_at
            FROM recipes r
            WHERE r.user_id = $1
              AND (cardinality($2::uuid[]) = 0 OR EXISTS (
                  SELECT 1 FROM recipe_tags rt
                  WHERE rt.recipe_id = r.id AND rt.tag_id = ANY($2)
              ))
              AND (cardinality($3::uuid[]) = 0 OR EXISTS (
                  SELECT 1 FROM recipe_ingredients ri
                  WHERE ri.recipe_id = r.id AND ri.ingredient_id = ANY($3)
              ))
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(user_id)
        .bind(&filter.tag_ids)
        .bind(&filter.ingredient_ids)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Update a recipe owned by `user_id`; replaces links when given
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        updates: UpdateRecipe,
    ) -> Result<Option<RecipeRecord>> {
        let mut tx = pool.begin().await?;

        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            UPDATE recipes SET
                title = COALESCE($3, title),
                time_minutes = COALESCE($4, time_minutes),
                price = COALESCE($5, price),
                link = COALESCE($6, link),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(updates.title)
        .bind(updates.time_minutes)
        .bind(updates.price)
        .bind(updates.link)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(recipe) = recipe else {
            return Ok(None);
        };

        if let Some(tag_ids) = &updates.tag_ids {
            AttributeRepository::set_recipe_links(&mut *tx, AttributeKind::Tag, recipe.id, tag_ids)
                .await?;
        }
        if let Some(ingredient_ids) = &updates.ingredient_ids {
            AttributeRepository::set_recipe_links(
                &mut *tx,
                AttributeKind::Ingredient,
                recipe.id,
                ingredient_ids,
            )
            .await?;
        }

        tx.commit().await?;

        Ok(Some(recipe))
    }

    /// Record a new image path; returns the previous path alongside the row
    pub async fn set_image(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        image: &str,
    ) -> Result<Option<(RecipeRecord, Option<String>)>> {
        let mut tx = pool.begin().await?;

        let previous = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT image FROM recipes
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(previous) = previous else {
            return Ok(None);
        };

        let recipe = sqlx::query_as::<_, RecipeRecord>(
            r#"
            UPDATE recipes SET image = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, time_minutes, price, link, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(image)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((recipe, previous)))
    }

    /// Delete a recipe owned by `user_id`
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
