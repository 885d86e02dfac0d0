use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::Result, models::ParentCategory};

/// Find category by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ParentCategory>> {
    let category =
        sqlx::query_as::<_, ParentCategory>("SELECT * FROM parent_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(category)
}

/// Get all categories in creation order
pub async fn get_all(pool: &PgPool) -> Result<Vec<ParentCategory>> {
    let categories = sqlx::query_as::<_, ParentCategory>(
        "SELECT * FROM parent_categories ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Create a new category
pub async fn insert_category(pool: &PgPool, category: &ParentCategory) -> Result<ParentCategory> {
    let category = sqlx::query_as::<_, ParentCategory>(
        "INSERT INTO parent_categories (id, name, image, status)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(&category.image)
    .bind(category.status)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Update an existing category
pub async fn update_category(
    pool: &PgPool,
    category: &ParentCategory,
) -> Result<Option<ParentCategory>> {
    let category = sqlx::query_as::<_, ParentCategory>(
        "UPDATE parent_categories
         SET name = $2, image = $3, status = $4, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(&category.image)
    .bind(category.status)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}
