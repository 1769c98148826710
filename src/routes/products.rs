use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState,
    error::Result,
    middleware::ProductMemo,
    models::{
        BatchCategoriesRequest, Category, InsertProductRequest, ListProductsRequest, LookupMap,
        Product, ProductPage, UpdateCategoriesRequest, UpdateProductRequest,
    },
    services::ActionMessage,
    utils::{AppJson, AppPath, AppQuery},
};

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub page_no: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListingParams>,
) -> Result<Json<ProductPage>> {
    let req = ListProductsRequest {
        page_no: params.page_no,
        page_size: params.page_size,
        sort_by: params.sort_by,
        ..Default::default()
    };
    let page = state.catalog.list_products(req).await?;

    Ok(Json(page))
}

pub async fn search_products(
    State(state): State<AppState>,
    AppJson(req): AppJson<ListProductsRequest>,
) -> Result<Json<ProductPage>> {
    let page = state.catalog.list_products(req).await?;

    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(memo): Extension<ProductMemo>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Product>> {
    let product = memo.get_product(&state.catalog, id).await?;

    Ok(Json(product))
}

pub async fn insert_product(
    State(state): State<AppState>,
    AppJson(req): AppJson<InsertProductRequest>,
) -> Result<Json<ActionMessage>> {
    Ok(Json(state.catalog.insert_product(req).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(req): AppJson<UpdateProductRequest>,
) -> Result<Json<ActionMessage>> {
    Ok(Json(state.catalog.update_product(id, req).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ActionMessage>> {
    Ok(Json(state.catalog.delete_product(id).await?))
}

pub async fn get_product_categories(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<Category>>> {
    let categories = state.catalog.product_categories(id).await?;

    Ok(Json(categories))
}

pub async fn update_product_categories(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(req): AppJson<UpdateCategoriesRequest>,
) -> Result<Json<ActionMessage>> {
    Ok(Json(
        state
            .catalog
            .update_product_categories(id, req.category_ids)
            .await?,
    ))
}

pub async fn get_all_product_categories(
    State(state): State<AppState>,
    AppJson(req): AppJson<BatchCategoriesRequest>,
) -> Result<Json<LookupMap<i32, Vec<Category>>>> {
    let ids: Vec<i32> = req.products.iter().map(|p| p.id).collect();
    let map = state.catalog.all_product_categories(&ids).await?;

    Ok(Json(map))
}
