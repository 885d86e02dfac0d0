mod categories;
mod health;
mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api/product", product_routes())
        .nest("/api/parentcategory", category_routes())
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/allproducts", get(products::get_all_products))
        .route("/featuredproducts", get(products::get_featured_products))
        .route(
            "/single-product/{parent_category}/{sub_category}",
            get(products::get_single_product),
        )
        .route("/update/{id}", put(products::update_product))
        .route("/delete/{id}", delete(products::delete_product))
        // One segment is either a create variant (POST) or a product id (GET).
        .route(
            "/{segment}",
            get(products::get_product).post(products::create_product),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(categories::create_category))
        .route("/getall", get(categories::get_all_categories))
        .route("/update/{id}", put(categories::update_category))
}
