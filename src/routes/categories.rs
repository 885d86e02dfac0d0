use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use http::StatusCode;
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    forms::{CategoryUpdate, MultipartForm, NewCategory},
    models::{CategoryListResponse, CreateCategoryResponse, UpdateCategoryResponse},
    queries::category_queries,
    services::category_service,
};

pub async fn create_category(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateCategoryResponse>)> {
    let form = MultipartForm::read(multipart).await?;
    let new = NewCategory::from_form(form)?;

    let (category, changes) = category_service::build_category(&state.media, new).await?;

    let category = match category_queries::insert_category(&state.db, &category).await {
        Ok(category) => category,
        Err(e) => {
            changes.rollback(&state.media).await;
            return Err(e);
        }
    };
    changes.commit(&state.media).await;

    tracing::info!("Created parent category {} ({})", category.id, category.name);

    Ok((
        StatusCode::CREATED,
        Json(CreateCategoryResponse {
            success: true,
            message: "Parent category created successfully".to_string(),
            parentcategory: category,
        }),
    ))
}

pub async fn get_all_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>> {
    let categories = category_queries::get_all(&state.db).await?;

    Ok(Json(CategoryListResponse {
        success: true,
        message: "Parent categories fetched successfully".to_string(),
        parentcategory: categories,
    }))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<UpdateCategoryResponse>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid category id".to_string()))?;
    let form = MultipartForm::read(multipart).await?;
    let update = CategoryUpdate::from_form(form)?;

    let mut category = category_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;

    let changes = category_service::apply_update(&state.media, &mut category, update).await?;

    let category = match category_queries::update_category(&state.db, &category).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            changes.rollback(&state.media).await;
            return Err(AppError::NotFound("Parent category not found".to_string()));
        }
        Err(e) => {
            changes.rollback(&state.media).await;
            return Err(e);
        }
    };
    changes.commit(&state.media).await;

    Ok(Json(UpdateCategoryResponse {
        success: true,
        message: "Parent category updated successfully".to_string(),
        category,
    }))
}
