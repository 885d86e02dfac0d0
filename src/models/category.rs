use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::MediaImage;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ParentCategory {
    pub id: Uuid,
    #[serde(rename = "categoryname")]
    pub name: String,
    #[serde(rename = "images")]
    pub image: Json<MediaImage>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParentCategory {
    pub fn new(name: String, image: MediaImage) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            image: Json(image),
            status: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCategoryResponse {
    pub success: bool,
    pub message: String,
    pub parentcategory: ParentCategory,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub message: String,
    pub parentcategory: Vec<ParentCategory>,
}

#[derive(Debug, Serialize)]
pub struct UpdateCategoryResponse {
    pub success: bool,
    pub message: String,
    pub category: ParentCategory,
}
