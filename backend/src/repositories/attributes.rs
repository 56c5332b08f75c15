//! Tag and ingredient repository
//!
//! Tags and ingredients share a shape (owner + name) and a relation to
//! recipes through a join table, so one repository serves both.

use anyhow::Result;
use chrono::{DateTime, Utc};
use recipe_api_shared::models::{Ingredient, Tag};
use sqlx::PgPool;
use uuid::Uuid;

/// Which recipe attribute a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Tag,
    Ingredient,
}

impl AttributeKind {
    fn table(self) -> &'static str {
        match self {
            AttributeKind::Tag => "tags",
            AttributeKind::Ingredient => "ingredients",
        }
    }

    fn join_table(self) -> &'static str {
        match self {
            AttributeKind::Tag => "recipe_tags",
            AttributeKind::Ingredient => "recipe_ingredients",
        }
    }

    fn join_column(self) -> &'static str {
        match self {
            AttributeKind::Tag => "tag_id",
            AttributeKind::Ingredient => "ingredient_id",
        }
    }

    /// Field name used in validation errors
    pub fn field(self) -> &'static str {
        match self {
            AttributeKind::Tag => "tags",
            AttributeKind::Ingredient => "ingredients",
        }
    }
}

/// Tag or ingredient row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttributeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<AttributeRecord> for Tag {
    fn from(record: AttributeRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
        }
    }
}

impl From<AttributeRecord> for Ingredient {
    fn from(record: AttributeRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
        }
    }
}

/// Tag or ingredient row together with the recipe it is linked to
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LinkedAttributeRecord {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<LinkedAttributeRecord> for AttributeRecord {
    fn from(linked: LinkedAttributeRecord) -> Self {
        Self {
            id: linked.id,
            user_id: linked.user_id,
            name: linked.name,
            created_at: linked.created_at,
        }
    }
}

/// Repository for tags and ingredients
pub struct AttributeRepository;

impl AttributeRepository {
    /// Create a tag or ingredient owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        kind: AttributeKind,
        user_id: Uuid,
        name: &str,
    ) -> Result<AttributeRecord> {
        let sql = format!(
            r#"
            INSERT INTO {table} (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
            table = kind.table(),
        );

        let record = sqlx::query_as::<_, AttributeRecord>(&sql)
            .bind(user_id)
            .bind(name)
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    /// List a user's tags or ingredients, ordered by name descending.
    ///
    /// With `assigned_only`, only rows linked to at least one of the
    /// user's recipes are returned, each once.
    pub async fn list_for_user(
        pool: &PgPool,
        kind: AttributeKind,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<AttributeRecord>> {
        let sql = format!(
            r#"
            SELECT a.id, a.user_id, a.name, a.created_at
            FROM {table} a
            WHERE a.user_id = $1
              AND (NOT $2 OR EXISTS (
                  SELECT 1
                  FROM {join} j
                  JOIN recipes r ON r.id = j.recipe_id
                  WHERE j.{column} = a.id AND r.user_id = $1
              ))
            ORDER BY a.name DESC, a.id DESC
            "#,
            table = kind.table(),
            join = kind.join_table(),
            column = kind.join_column(),
        );

        let records = sqlx::query_as::<_, AttributeRecord>(&sql)
            .bind(user_id)
            .bind(assigned_only)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Count how many of `ids` exist and belong to `user_id`
    pub async fn count_owned(
        pool: &PgPool,
        kind: AttributeKind,
        user_id: Uuid,
        ids: &[Uuid],
    ) -> Result<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM {table}
            WHERE user_id = $1 AND id = ANY($2)
            "#,
            table = kind.table(),
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .bind(ids)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Load the tags or ingredients linked to each of `recipe_ids`
    pub async fn list_for_recipes(
        pool: &PgPool,
        kind: AttributeKind,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<LinkedAttributeRecord>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT j.recipe_id, a.id, a.user_id, a.name, a.created_at
            FROM {join} j
            JOIN {table} a ON a.id = j.{column}
            WHERE j.recipe_id = ANY($1)
            ORDER BY a.name, a.id
            "#,
            table = kind.table(),
            join = kind.join_table(),
            column = kind.join_column(),
        );

        let records = sqlx::query_as::<_, LinkedAttributeRecord>(&sql)
            .bind(recipe_ids)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Replace the links between one recipe and its tags or ingredients
    pub async fn set_recipe_links(
        conn: &mut sqlx::PgConnection,
        kind: AttributeKind,
        recipe_id: Uuid,
        ids: &[Uuid],
    ) -> Result<()> {
        let delete_sql = format!(
            "DELETE FROM {join} WHERE recipe_id = $1",
            join = kind.join_table(),
        );
        sqlx::query(&delete_sql)
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        if ids.is_empty() {
            return Ok(());
        }

        let insert_sql = format!(
            r#"
            INSERT INTO {join} (recipe_id, {column})
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
            join = kind.join_table(),
            column = kind.join_column(),
        );
        sqlx::query(&insert_sql)
            .bind(recipe_id)
            .bind(ids)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
