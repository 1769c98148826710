//! Persistence seam for the catalog.
//!
//! [`PgCatalogStore`] renders listing predicates to SQL and runs every
//! multi-statement mutation inside a [`crate::database::ConstraintScope`].
//! [`InMemoryCatalogStore`] evaluates the same predicates directly and backs
//! local development and tests.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        Brand, Category, DeleteSummary, NewProduct, Product, ProductCategoryName,
        UpdateProductRequest,
    },
    queries::ListingQuery,
};

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Verify the backing store is reachable
    async fn ping(&self) -> Result<()>;

    /// Number of products matching the listing predicate, ignoring pagination
    async fn count_products(&self, listing: &ListingQuery) -> Result<i64>;

    /// One page of distinct products matching the listing predicate
    async fn fetch_page(&self, listing: &ListingQuery) -> Result<Vec<Product>>;

    async fn find_product(&self, id: i32) -> Result<Option<Product>>;

    async fn insert_product(&self, row: NewProduct) -> Result<Product>;

    /// Overwrite all mutable columns; returns the number of rows touched
    async fn update_product(&self, id: i32, changes: UpdateProductRequest) -> Result<u64>;

    /// Delete a product together with its category links, reviews and comments
    async fn delete_product(&self, id: i32) -> Result<DeleteSummary>;

    /// Drop every category link of a product and insert the given ones
    async fn replace_product_categories(&self, product_id: i32, category_ids: &[i32])
    -> Result<()>;

    async fn product_categories(&self, product_id: i32) -> Result<Vec<Category>>;

    /// Category rows for many products, tagged with their product id
    async fn categories_for_products(&self, product_ids: &[i32])
    -> Result<Vec<ProductCategoryName>>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn list_brands(&self) -> Result<Vec<Brand>>;

    /// Brands whose id is in `ids`; missing ids are simply absent
    async fn brands_by_ids(&self, ids: &[i32]) -> Result<Vec<Brand>>;
}
