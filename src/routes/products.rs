use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use http::StatusCode;
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    forms::{CreateVariant, MultipartForm, NewProduct, ProductUpdate},
    models::{FeaturedProductsResponse, MessageResponse, ProductListResponse, ProductResponse},
    queries::products_queries,
    services::product_service,
};

pub async fn create_product(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let variant: CreateVariant = variant.parse()?;
    let form = MultipartForm::read(multipart).await?;
    let new = NewProduct::from_form(variant, form)?;

    let (product, changes) = product_service::build_product(&state.media, new).await?;

    let product = match products_queries::insert_product(&state.db, &product).await {
        Ok(product) => product,
        Err(e) => {
            changes.rollback(&state.media).await;
            return Err(e);
        }
    };
    changes.commit(&state.media).await;

    tracing::info!("Created product {} ({})", product.id, product.title);

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;
    let form = MultipartForm::read(multipart).await?;
    let update = ProductUpdate::from_form(form)?;

    let mut product = products_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(product_not_found)?;

    let changes = product_service::apply_update(&state.media, &mut product, update).await?;

    let product = match products_queries::update_product(&state.db, &product).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            changes.rollback(&state.media).await;
            return Err(product_not_found());
        }
        Err(e) => {
            changes.rollback(&state.media).await;
            return Err(e);
        }
    };
    changes.commit(&state.media).await;

    Ok(Json(ProductResponse {
        success: true,
        message: "Product updated successfully".to_string(),
        product,
    }))
}

pub async fn get_all_products(State(state): State<AppState>) -> Result<Json<ProductListResponse>> {
    let products = products_queries::find_all(&state.db).await?;

    if products.is_empty() {
        return Err(AppError::NotFound("No products found".to_string()));
    }

    Ok(Json(ProductListResponse {
        success: true,
        message: "All products fetched successfully".to_string(),
        allproducts: products,
    }))
}

pub async fn get_featured_products(
    State(state): State<AppState>,
) -> Result<Json<FeaturedProductsResponse>> {
    let products = products_queries::find_featured(&state.db).await?;

    if products.is_empty() {
        return Err(AppError::NotFound("No featured products found".to_string()));
    }

    Ok(Json(FeaturedProductsResponse {
        success: true,
        message: "Featured products fetched successfully".to_string(),
        featured_products: products,
    }))
}

pub async fn get_single_product(
    State(state): State<AppState>,
    Path((parent_category, sub_category)): Path<(String, String)>,
) -> Result<Json<ProductResponse>> {
    let product =
        products_queries::find_active_by_categories(&state.db, &parent_category, &sub_category)
            .await?
            .ok_or_else(product_not_found)?;

    Ok(Json(ProductResponse {
        success: true,
        message: "Product fetched successfully".to_string(),
        product,
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let id = parse_id(&id)?;

    let product = products_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(product_not_found)?;

    Ok(Json(ProductResponse {
        success: true,
        message: "Product fetched successfully".to_string(),
        product,
    }))
}

/// Marks the product deleted; its media stays in place.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    if !products_queries::soft_delete(&state.db, id).await? {
        return Err(product_not_found());
    }

    tracing::info!("Soft deleted product {}", id);

    Ok(Json(MessageResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
    }))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid product id".to_string()))
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}
