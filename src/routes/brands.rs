use axum::{Json, extract::State};

use crate::{
    AppState,
    error::Result,
    models::{Brand, BrandNamesRequest, LookupKey, LookupMap},
    utils::AppJson,
};

pub async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>> {
    let brands = state.catalog.list_brands().await?;

    Ok(Json(brands))
}

pub async fn map_brand_ids_to_names(
    State(state): State<AppState>,
    AppJson(req): AppJson<BrandNamesRequest>,
) -> Result<Json<LookupMap<LookupKey, Option<String>>>> {
    let names = state.catalog.map_brand_ids_to_names(req.ids).await?;

    Ok(Json(names))
}
