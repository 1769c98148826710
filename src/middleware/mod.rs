use std::{collections::HashMap, sync::Arc};

use axum::{extract::Request, middleware::Next, response::Response};
use tokio::sync::Mutex;

use crate::{error::Result, models::Product, services::CatalogService};

/// Products already loaded while serving the current request.
#[derive(Debug, Clone, Default)]
pub struct ProductMemo {
    products: Arc<Mutex<HashMap<i32, Product>>>,
}

impl ProductMemo {
    /// Return the memoized product or load it once through `catalog`.
    pub async fn get_product(&self, catalog: &CatalogService, id: i32) -> Result<Product> {
        let mut products = self.products.lock().await;
        if let Some(product) = products.get(&id) {
            return Ok(product.clone());
        }

        let product = catalog.get_product(id).await?;
        products.insert(id, product.clone());
        Ok(product)
    }

    pub async fn cached_count(&self) -> usize {
        self.products.lock().await.len()
    }
}

pub async fn memo_middleware(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(ProductMemo::default());

    next.run(req).await
}
