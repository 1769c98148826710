mod brands;
mod categories;
mod health;
mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/products",
            get(products::list_products).post(products::insert_product),
        )
        .route("/products/search", post(products::search_products))
        .route(
            "/products/categories",
            post(products::get_all_product_categories),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/{id}/categories",
            get(products::get_product_categories).put(products::update_product_categories),
        )
        .route("/categories", get(categories::list_categories))
        .route("/brands", get(brands::list_brands))
        .route("/brands/names", post(brands::map_brand_ids_to_names))
}
