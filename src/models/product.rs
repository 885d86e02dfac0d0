use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::{MediaImage, ParameterGroup, PdfAssets, StoredFile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            other => Err(format!("Invalid status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub usp_points: Vec<String>,
    pub parent_category: String,
    pub sub_category: Option<String>,
    pub status: ProductStatus,
    pub featured: bool,
    pub images: Json<Vec<MediaImage>>,
    pub feature_pictures: Json<Vec<MediaImage>>,
    pub videos: Json<Vec<StoredFile>>,
    pub parameters: Json<Vec<ParameterGroup>>,
    pub pdf: Json<PdfAssets>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Blank product with the required fields set, not yet persisted.
    pub fn new(title: String, description: String, parent_category: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            subtitle: None,
            description,
            usp_points: Vec::new(),
            parent_category,
            sub_category: None,
            status: ProductStatus::default(),
            featured: false,
            images: Json(Vec::new()),
            feature_pictures: Json(Vec::new()),
            videos: Json(Vec::new()),
            parameters: Json(Vec::new()),
            pdf: Json(PdfAssets::default()),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub message: String,
    pub allproducts: Vec<Product>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProductsResponse {
    pub success: bool,
    pub message: String,
    pub featured_products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
