use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Product, ProductStatus},
};

pub async fn insert_product(pool: &PgPool, product: &Product) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            id, title, subtitle, description, usp_points, parent_category,
            sub_category, status, featured, images, feature_pictures, videos,
            parameters, pdf
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(product.id)
    .bind(&product.title)
    .bind(&product.subtitle)
    .bind(&product.description)
    .bind(&product.usp_points)
    .bind(&product.parent_category)
    .bind(&product.sub_category)
    .bind(product.status)
    .bind(product.featured)
    .bind(&product.images)
    .bind(&product.feature_pictures)
    .bind(&product.videos)
    .bind(&product.parameters)
    .bind(&product.pdf)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE deleted_at IS NULL ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_featured(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products
         WHERE featured = true AND deleted_at IS NULL
         ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// First active product filed under the given category pair.
pub async fn find_active_by_categories(
    pool: &PgPool,
    parent_category: &str,
    sub_category: &str,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products
         WHERE parent_category = $1
           AND sub_category = $2
           AND status = $3
           AND deleted_at IS NULL
         ORDER BY created_at ASC
         LIMIT 1",
    )
    .bind(parent_category)
    .bind(sub_category)
    .bind(ProductStatus::Active)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Writes the whole document back; `None` if it was deleted in the meantime.
pub async fn update_product(pool: &PgPool, product: &Product) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            title = $2,
            subtitle = $3,
            description = $4,
            usp_points = $5,
            parent_category = $6,
            sub_category = $7,
            status = $8,
            featured = $9,
            images = $10,
            feature_pictures = $11,
            videos = $12,
            parameters = $13,
            pdf = $14,
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(product.id)
    .bind(&product.title)
    .bind(&product.subtitle)
    .bind(&product.description)
    .bind(&product.usp_points)
    .bind(&product.parent_category)
    .bind(&product.sub_category)
    .bind(product.status)
    .bind(product.featured)
    .bind(&product.images)
    .bind(&product.feature_pictures)
    .bind(&product.videos)
    .bind(&product.parameters)
    .bind(&product.pdf)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE products SET deleted_at = NOW(), updated_at = NOW()
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
