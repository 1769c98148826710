use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, CorsConfig, ServerConfig},
    database,
    error::{AppError, Result},
    middleware::memo_middleware,
    routes,
    services::{CatalogService, revalidate_service},
    store::PgCatalogStore,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let store = Arc::new(PgCatalogStore::new(pool));
    let revalidator = revalidate_service::from_config(&config.revalidate);

    let state = AppState {
        catalog: CatalogService::new(store, revalidator, config.catalog),
    };

    router(state, &config.server, &config.cors)
}

/// Routes plus the layers every request passes through.
pub fn router(state: AppState, server: &ServerConfig, cors: &CorsConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let app = routes::create_router()
        .layer(from_fn(memo_middleware))
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
