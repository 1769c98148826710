use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    database::{self, ConstraintScope},
    error::Result,
    models::{
        Brand, Category, DeleteSummary, NewProduct, Product, ProductCategoryName,
        UpdateProductRequest,
    },
    queries::{ListingQuery, brand_queries, category_queries, products_queries},
    store::CatalogStore,
};

#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }

    async fn count_products(&self, listing: &ListingQuery) -> Result<i64> {
        products_queries::count_products(&self.pool, listing).await
    }

    async fn fetch_page(&self, listing: &ListingQuery) -> Result<Vec<Product>> {
        products_queries::fetch_page(&self.pool, listing).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        products_queries::find_by_id(&self.pool, id).await
    }

    async fn insert_product(&self, row: NewProduct) -> Result<Product> {
        products_queries::insert_product(&self.pool, &row).await
    }

    async fn update_product(&self, id: i32, changes: UpdateProductRequest) -> Result<u64> {
        let mut scope = ConstraintScope::begin(&self.pool, "update_product").await?;
        let rows = products_queries::update_product(scope.conn(), id, &changes).await?;
        scope.commit().await?;

        Ok(rows)
    }

    async fn delete_product(&self, id: i32) -> Result<DeleteSummary> {
        let mut scope = ConstraintScope::begin(&self.pool, "delete_product").await?;
        let summary = products_queries::delete_product_cascade(scope.conn(), id).await?;
        scope.commit().await?;

        Ok(summary)
    }

    async fn replace_product_categories(
        &self,
        product_id: i32,
        category_ids: &[i32],
    ) -> Result<()> {
        let mut scope = ConstraintScope::begin(&self.pool, "replace_product_categories").await?;
        category_queries::replace_product_categories(scope.conn(), product_id, category_ids)
            .await?;
        scope.commit().await
    }

    async fn product_categories(&self, product_id: i32) -> Result<Vec<Category>> {
        category_queries::get_product_categories(&self.pool, product_id).await
    }

    async fn categories_for_products(
        &self,
        product_ids: &[i32],
    ) -> Result<Vec<ProductCategoryName>> {
        category_queries::get_categories_for_products(&self.pool, product_ids).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        category_queries::get_all(&self.pool).await
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        brand_queries::get_all(&self.pool).await
    }

    async fn brands_by_ids(&self, ids: &[i32]) -> Result<Vec<Brand>> {
        brand_queries::find_by_ids(&self.pool, ids).await
    }
}
