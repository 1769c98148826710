use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, Result},
    models::{
        Brand, Category, Comment, DeleteSummary, NewProduct, Product, ProductCategory,
        ProductCategoryName, Review, SortColumn, UpdateProductRequest,
    },
    queries::ListingQuery,
    store::CatalogStore,
};

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    categories: Vec<Category>,
    product_categories: Vec<ProductCategory>,
    brands: Vec<Brand>,
    reviews: Vec<Review>,
    comments: Vec<Comment>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn category_ids_of(&self, product_id: i32) -> Vec<i32> {
        self.product_categories
            .iter()
            .filter(|link| link.product_id == product_id)
            .map(|link| link.category_id)
            .collect()
    }

    fn product_exists(&self, id: i32) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    fn matching(&self, listing: &ListingQuery) -> Result<Vec<&Product>> {
        let mut matched = Vec::new();
        for product in &self.products {
            let category_ids = self.category_ids_of(product.id);
            if listing.predicate.matches(product, &category_ids)? {
                matched.push(product);
            }
        }
        Ok(matched)
    }
}

/// In-memory implementation of CatalogStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_category(&self, name: &str) -> Category {
        let mut tables = self.tables.write().await;
        let category = Category {
            id: tables.next_id(),
            name: name.to_string(),
        };
        tables.categories.push(category.clone());
        category
    }

    pub async fn add_brand(&self, name: &str) -> Brand {
        let mut tables = self.tables.write().await;
        let brand = Brand {
            id: tables.next_id(),
            name: name.to_string(),
        };
        tables.brands.push(brand.clone());
        brand
    }

    pub async fn add_review(&self, product_id: i32, rating: i32, body: &str) -> Result<Review> {
        let mut tables = self.tables.write().await;
        if !tables.product_exists(product_id) {
            return Err(foreign_key_violation("reviews", product_id));
        }

        let review = Review {
            id: tables.next_id(),
            product_id,
            rating,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        tables.reviews.push(review.clone());
        Ok(review)
    }

    pub async fn add_comment(&self, product_id: i32, body: &str) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.product_exists(product_id) {
            return Err(foreign_key_violation("comments", product_id));
        }

        let comment = Comment {
            id: tables.next_id(),
            product_id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    /// Rows still referencing `product_id`, per table.
    pub async fn dependent_counts(&self, product_id: i32) -> DeleteSummary {
        let tables = self.tables.read().await;
        DeleteSummary {
            product_categories: tables
                .product_categories
                .iter()
                .filter(|link| link.product_id == product_id)
                .count() as u64,
            reviews: tables
                .reviews
                .iter()
                .filter(|r| r.product_id == product_id)
                .count() as u64,
            comments: tables
                .comments
                .iter()
                .filter(|c| c.product_id == product_id)
                .count() as u64,
            products: u64::from(tables.product_exists(product_id)),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn count_products(&self, listing: &ListingQuery) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.matching(listing)?.len() as i64)
    }

    async fn fetch_page(&self, listing: &ListingQuery) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut matched = tables.matching(listing)?;

        if let Some(sort) = listing.sort {
            matched.sort_by(|a, b| {
                let ordering = compare(a, b, sort.column());
                if sort.is_descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let offset = usize::try_from(listing.window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(listing.window.page_size).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, row: NewProduct) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let product = Product {
            id: tables.next_id(),
            brand_id: row.brands.first().copied(),
            name: row.name,
            description: row.description,
            price: row.price,
            old_price: row.old_price,
            discount: row.discount,
            rating: row.rating,
            colors: row.colors,
            brands: Json(row.brands),
            gender: row.gender,
            occasion: row.occasion,
            image_url: row.image_url,
            created_at: Utc::now(),
        };
        tables.products.push(product.clone());

        tracing::debug!(product_id = product.id, "Stored product in memory");
        Ok(product)
    }

    async fn update_product(&self, id: i32, changes: UpdateProductRequest) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };

        product.name = changes.name;
        product.description = changes.description;
        product.old_price = changes.old_price;
        product.discount = changes.discount;
        product.rating = changes.rating;
        product.colors = changes.colors;
        product.brand_id = changes.brands.first().copied();
        product.brands = Json(changes.brands);
        product.gender = changes.gender;
        product.occasion = changes.occasion;
        product.image_url = changes.image_url;

        Ok(1)
    }

    async fn delete_product(&self, id: i32) -> Result<DeleteSummary> {
        let mut tables = self.tables.write().await;

        let product_categories = remove_where(&mut tables.product_categories, |l| l.product_id == id);
        let reviews = remove_where(&mut tables.reviews, |r| r.product_id == id);
        let comments = remove_where(&mut tables.comments, |c| c.product_id == id);
        let products = remove_where(&mut tables.products, |p| p.id == id);

        Ok(DeleteSummary {
            product_categories,
            reviews,
            comments,
            products,
        })
    }

    async fn replace_product_categories(
        &self,
        product_id: i32,
        category_ids: &[i32],
    ) -> Result<()> {
        let mut tables = self.tables.write().await;

        if !category_ids.is_empty() && !tables.product_exists(product_id) {
            return Err(foreign_key_violation("product_categories", product_id));
        }
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !tables.categories.iter().any(|c| c.id == **id))
        {
            return Err(foreign_key_violation("product_categories", *missing));
        }

        tables
            .product_categories
            .retain(|link| link.product_id != product_id);
        tables
            .product_categories
            .extend(category_ids.iter().map(|category_id| ProductCategory {
                product_id,
                category_id: *category_id,
            }));

        Ok(())
    }

    async fn product_categories(&self, product_id: i32) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;
        let ids = tables.category_ids_of(product_id);

        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.id);

        Ok(categories)
    }

    async fn categories_for_products(
        &self,
        product_ids: &[i32],
    ) -> Result<Vec<ProductCategoryName>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<ProductCategoryName> = tables
            .product_categories
            .iter()
            .filter(|link| product_ids.contains(&link.product_id))
            .filter_map(|link| {
                tables
                    .categories
                    .iter()
                    .find(|c| c.id == link.category_id)
                    .map(|category| ProductCategoryName {
                        product_id: link.product_id,
                        category: category.clone(),
                    })
            })
            .collect();
        rows.sort_by_key(|row| (row.product_id, row.category.id));

        Ok(rows)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn list_brands(&self) -> Result<Vec<Brand>> {
        let tables = self.tables.read().await;
        let mut brands = tables.brands.clone();
        brands.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(brands)
    }

    async fn brands_by_ids(&self, ids: &[i32]) -> Result<Vec<Brand>> {
        let tables = self.tables.read().await;
        Ok(tables
            .brands
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }
}

fn compare(a: &Product, b: &Product, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Price => a.price.cmp(&b.price),
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        SortColumn::Rating => a.rating.cmp(&b.rating),
    }
}

fn remove_where<T>(rows: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> u64 {
    let before = rows.len();
    rows.retain(|row| !predicate(row));
    (before - rows.len()) as u64
}

fn foreign_key_violation(table: &str, key: i32) -> AppError {
    AppError::InternalError(format!(
        "insert on \"{}\" violates foreign key constraint for key {}",
        table, key
    ))
}
