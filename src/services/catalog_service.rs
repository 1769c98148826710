use std::{collections::HashSet, sync::Arc};

use serde::Serialize;

use crate::{
    config::CatalogConfig,
    error::{AppError, Result},
    models::{
        Brand, Category, DeleteSummary, InsertProductRequest, ListProductsRequest, LookupKey,
        LookupMap, NewProduct, Product, ProductPage, UpdateProductRequest,
    },
    queries::{ListingQuery, PageWindow},
    services::revalidate_service::Revalidator,
    store::CatalogStore,
};

const DELETE_FAILED: &str = "Something went wrong, Cannot delete the product";
const UPDATE_FAILED: &str = "Could not update the product";
const UPDATE_CATEGORIES_FAILED: &str = "Could not update product categories";
const INSERT_FAILED: &str = "Could not insert the product";
const FIND_FAILED: &str = "Could not find the product";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionMessage {
    pub message: &'static str,
}

impl ActionMessage {
    pub fn success() -> Self {
        Self { message: "success" }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    revalidator: Arc<dyn Revalidator>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        revalidator: Arc<dyn Revalidator>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            store,
            revalidator,
            config,
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Filtered, sorted, paginated listing plus the total match count.
    pub async fn list_products(&self, req: ListProductsRequest) -> Result<ProductPage> {
        let page_size = req
            .page_size
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        let window = PageWindow::new(req.page_no.unwrap_or(1), page_size)?;
        let listing = ListingQuery::new(&req.filters, req.sort_by.as_deref(), window);

        let count = self.store.count_products(&listing).await?;
        let products = self.store.fetch_page(&listing).await?;

        tracing::debug!(
            count,
            page_no = window.page_no,
            returned = products.len(),
            "Listed products"
        );

        Ok(ProductPage {
            count,
            last_page: window.last_page(count),
            num_of_results_on_cur_page: products.len(),
            products,
        })
    }

    pub async fn get_product(&self, id: i32) -> Result<Product> {
        match self.store.find_product(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(AppError::NotFound(FIND_FAILED.to_string())),
            Err(e) => {
                tracing::error!("Failed to load product {}: {}", id, e);
                Err(AppError::ActionFailed(FIND_FAILED))
            }
        }
    }

    pub async fn delete_product(&self, id: i32) -> Result<ActionMessage> {
        let summary = self.store.delete_product(id).await.map_err(|e| {
            tracing::error!("Failed to delete product {}: {}", id, e);
            AppError::ActionFailed(DELETE_FAILED)
        })?;

        log_delete(id, summary);
        self.revalidate("/products").await;

        Ok(ActionMessage::success())
    }

    pub async fn update_product(
        &self,
        id: i32,
        changes: UpdateProductRequest,
    ) -> Result<ActionMessage> {
        let rows = self.store.update_product(id, changes).await.map_err(|e| {
            tracing::error!("Failed to update product {}: {}", id, e);
            AppError::ActionFailed(UPDATE_FAILED)
        })?;

        if rows == 0 {
            tracing::warn!("Update matched no product with id {}", id);
        }
        self.revalidate(&format!("/products/{}", id)).await;

        Ok(ActionMessage::success())
    }

    /// Replace the product's category links with `category_ids`.
    pub async fn update_product_categories(
        &self,
        id: i32,
        category_ids: Vec<i32>,
    ) -> Result<ActionMessage> {
        let mut seen = HashSet::with_capacity(category_ids.len());
        let category_ids: Vec<i32> = category_ids
            .into_iter()
            .filter(|category_id| seen.insert(*category_id))
            .collect();

        self.store
            .replace_product_categories(id, &category_ids)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update categories of product {}: {}", id, e);
                AppError::ActionFailed(UPDATE_CATEGORIES_FAILED)
            })?;

        self.revalidate(&format!("/products/{}", id)).await;

        Ok(ActionMessage::success())
    }

    pub async fn insert_product(&self, req: InsertProductRequest) -> Result<ActionMessage> {
        let insert_failed = |e: AppError| {
            tracing::error!("Failed to insert product: {}", e);
            AppError::ActionFailed(INSERT_FAILED)
        };

        let row = NewProduct::try_from(req).map_err(insert_failed)?;
        let product = self.store.insert_product(row).await.map_err(insert_failed)?;

        tracing::info!(product_id = product.id, "Inserted product");
        self.revalidate("/products").await;

        Ok(ActionMessage::success())
    }

    pub async fn product_categories(&self, id: i32) -> Result<Vec<Category>> {
        self.store.product_categories(id).await
    }

    /// Categories of each product, keyed by product id in input order.
    pub async fn all_product_categories(
        &self,
        product_ids: &[i32],
    ) -> Result<LookupMap<i32, Vec<Category>>> {
        let mut map: LookupMap<i32, Vec<Category>> =
            product_ids.iter().map(|id| (*id, Vec::new())).collect();
        if map.is_empty() {
            return Ok(map);
        }

        let ids: Vec<i32> = map.keys().copied().collect();
        for row in self.store.categories_for_products(&ids).await? {
            if let Some(categories) = map.get_mut(&row.product_id) {
                categories.push(row.category);
            }
        }

        Ok(map)
    }

    /// Brand name for each identifier as given; unknown or malformed ids map to `None`.
    pub async fn map_brand_ids_to_names(
        &self,
        ids: Vec<LookupKey>,
    ) -> Result<LookupMap<LookupKey, Option<String>>> {
        let numeric: Vec<i32> = ids.iter().filter_map(LookupKey::as_id).collect();
        let brands = if numeric.is_empty() {
            Vec::new()
        } else {
            self.store.brands_by_ids(&numeric).await?
        };

        let mut map = LookupMap::with_capacity(ids.len());
        for key in ids {
            let name = key.as_id().and_then(|id| brand_name(&brands, id));
            map.insert(key, name);
        }

        Ok(map)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories().await
    }

    pub async fn list_brands(&self) -> Result<Vec<Brand>> {
        self.store.list_brands().await
    }

    async fn revalidate(&self, path: &str) {
        if let Err(e) = self.revalidator.revalidate_path(path).await {
            tracing::warn!("Failed to revalidate {}: {}", path, e);
        }
    }
}

fn brand_name(brands: &[Brand], id: i32) -> Option<String> {
    brands.iter().find(|b| b.id == id).map(|b| b.name.clone())
}

fn log_delete(id: i32, summary: DeleteSummary) {
    if summary.products == 0 {
        tracing::warn!("Delete matched no product with id {}", id);
        return;
    }
    tracing::info!(
        product_id = id,
        categories = summary.product_categories,
        reviews = summary.reviews,
        comments = summary.comments,
        "Deleted product"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{FilterValue, ProductFilters, Selection},
        services::revalidate_service::RecordingRevalidator,
        store::InMemoryCatalogStore,
    };
    use rust_decimal::Decimal;
    use serde_json::json;

    fn service(store: &InMemoryCatalogStore) -> (CatalogService, RecordingRevalidator) {
        let revalidator = RecordingRevalidator::new();
        let service = CatalogService::new(
            Arc::new(store.clone()),
            Arc::new(revalidator.clone()),
            CatalogConfig::default(),
        );
        (service, revalidator)
    }

    fn insert_request(name: &str, old_price: i64, discount: i64) -> InsertProductRequest {
        serde_json::from_value(json!({
            "name": name,
            "old_price": old_price,
            "discount": discount,
            "gender": "women",
            "brands": [{ "value": 1 }],
            "occasion": [{ "value": "party" }]
        }))
        .unwrap()
    }

    async fn first_product(service: &CatalogService) -> Product {
        let page = service
            .list_products(ListProductsRequest::default())
            .await
            .unwrap();
        page.products.into_iter().next().unwrap()
    }

    #[tokio::test]
    async fn test_insert_derives_price() {
        let store = InMemoryCatalogStore::new();
        let (service, revalidator) = service(&store);

        let result = service
            .insert_product(insert_request("Linen dress", 100, 20))
            .await
            .unwrap();
        assert_eq!(result, ActionMessage::success());

        let product = first_product(&service).await;
        assert_eq!(product.price, Decimal::new(8000, 2));
        assert_eq!(product.occasion, "party");
        assert_eq!(revalidator.paths(), vec!["/products".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_removes_dependents() {
        let store = InMemoryCatalogStore::new();
        let (service, revalidator) = service(&store);
        let category = store.add_category("Dresses").await;

        service
            .insert_product(insert_request("Linen dress", 100, 0))
            .await
            .unwrap();
        let product = first_product(&service).await;
        service
            .update_product_categories(product.id, vec![category.id])
            .await
            .unwrap();
        store.add_review(product.id, 5, "Lovely").await.unwrap();
        store.add_comment(product.id, "Runs small").await.unwrap();

        service.delete_product(product.id).await.unwrap();

        assert_eq!(
            store.dependent_counts(product.id).await,
            DeleteSummary::default()
        );
        assert_eq!(revalidator.paths().last().map(String::as_str), Some("/products"));
    }

    #[tokio::test]
    async fn test_missing_ids_still_succeed() {
        let store = InMemoryCatalogStore::new();
        let (service, revalidator) = service(&store);

        assert!(service.delete_product(404).await.is_ok());

        let changes: UpdateProductRequest = serde_json::from_value(json!({
            "name": "Ghost",
            "old_price": 10
        }))
        .unwrap();
        assert!(service.update_product(404, changes).await.is_ok());
        assert_eq!(revalidator.paths(), vec!["/products", "/products/404"]);
    }

    #[tokio::test]
    async fn test_replace_categories() {
        let store = InMemoryCatalogStore::new();
        let (service, _) = service(&store);
        let a = store.add_category("A").await;
        let b = store.add_category("B").await;
        let c = store.add_category("C").await;

        service
            .insert_product(insert_request("Coat", 200, 0))
            .await
            .unwrap();
        let product = first_product(&service).await;

        service
            .update_product_categories(product.id, vec![a.id, b.id])
            .await
            .unwrap();
        service
            .update_product_categories(product.id, vec![b.id, c.id, c.id])
            .await
            .unwrap();

        let ids: Vec<i32> = service
            .product_categories(product.id)
            .await
            .unwrap()
            .iter()
            .map(|category| category.id)
            .collect();
        assert_eq!(ids, vec![b.id, c.id]);
    }

    #[tokio::test]
    async fn test_invalid_insert_reports_fixed_message() {
        let store = InMemoryCatalogStore::new();
        let (service, revalidator) = service(&store);

        let bad_brand: InsertProductRequest = serde_json::from_value(json!({
            "name": "Watch",
            "old_price": 10,
            "brands": [{ "value": "acme" }]
        }))
        .unwrap();
        let huge_price: InsertProductRequest = serde_json::from_value(json!({
            "name": "Crown",
            "old_price": "79228162514264337593543950335",
            "discount": 200
        }))
        .unwrap();

        for req in [bad_brand, huge_price] {
            assert!(matches!(
                service.insert_product(req).await,
                Err(AppError::ActionFailed(INSERT_FAILED))
            ));
        }
        assert_eq!(store.dependent_counts(1).await, DeleteSummary::default());
        assert!(revalidator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_failed_category_update_reports_fixed_message() {
        let store = InMemoryCatalogStore::new();
        let (service, revalidator) = service(&store);

        let result = service.update_product_categories(1, vec![77]).await;
        assert!(matches!(
            result,
            Err(AppError::ActionFailed(UPDATE_CATEGORIES_FAILED))
        ));
        assert!(revalidator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_batch_categories_keep_input_order() {
        let store = InMemoryCatalogStore::new();
        let (service, _) = service(&store);
        let a = store.add_category("A").await;
        let b = store.add_category("B").await;

        service
            .insert_product(insert_request("P1", 10, 0))
            .await
            .unwrap();
        service
            .insert_product(insert_request("P2", 10, 0))
            .await
            .unwrap();
        let page = service
            .list_products(ListProductsRequest {
                sort_by: Some("price-asc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let p1 = page.products.iter().find(|p| p.name == "P1").unwrap().id;
        let p2 = page.products.iter().find(|p| p.name == "P2").unwrap().id;

        service
            .update_product_categories(p1, vec![b.id, a.id])
            .await
            .unwrap();

        let map = service.all_product_categories(&[p2, p1]).await.unwrap();
        let entries = map.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (p2, vec![]));
        assert_eq!(entries[1].0, p1);
        assert_eq!(entries[1].1, vec![a, b]);
    }

    #[tokio::test]
    async fn test_brand_names_keep_given_keys() {
        let store = InMemoryCatalogStore::new();
        let (service, _) = service(&store);
        let acme = store.add_brand("Acme").await;

        let keys = vec![
            LookupKey::from("nope"),
            LookupKey::from(acme.id),
            LookupKey::Text(acme.id.to_string()),
            LookupKey::from(9999),
        ];
        let map = service.map_brand_ids_to_names(keys).await.unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            format!(r#"{{"nope":null,"{}":"Acme","9999":null}}"#, acme.id)
        );
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let store = InMemoryCatalogStore::new();
        let (service, _) = service(&store);

        let page = service
            .list_products(ListProductsRequest {
                sort_by: Some("most-popular".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 0);
        assert_eq!(page.last_page, 0);
        assert_eq!(page.num_of_results_on_cur_page, 0);
    }

    #[tokio::test]
    async fn test_unrecognized_filters_list_like_no_filters() {
        let store = InMemoryCatalogStore::new();
        let (service, _) = service(&store);
        for name in ["a", "b", "c"] {
            service
                .insert_product(insert_request(name, 10, 0))
                .await
                .unwrap();
        }

        let filters: ProductFilters = serde_json::from_value(json!({ "colour": "teal" })).unwrap();
        let filtered = service
            .list_products(ListProductsRequest {
                page_size: Some(2),
                filters,
                ..Default::default()
            })
            .await
            .unwrap();
        let unfiltered = service
            .list_products(ListProductsRequest {
                page_size: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(filtered.count, unfiltered.count);
        assert_eq!(filtered.count, 3);
        assert_eq!(filtered.last_page, 2);
        assert_eq!(filtered.num_of_results_on_cur_page, 2);
    }

    #[tokio::test]
    async fn test_page_size_is_capped() {
        let store = InMemoryCatalogStore::new();
        let (service, _) = service(&store);
        service
            .insert_product(insert_request("only", 10, 0))
            .await
            .unwrap();

        let page = service
            .list_products(ListProductsRequest {
                page_size: Some(10_000),
                filters: ProductFilters {
                    gender: Some(FilterValue::Text("women".to_string())),
                    occasions: Some(vec![Selection {
                        value: FilterValue::Text("party".to_string()),
                    }]),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.last_page, 1);

        let rejected = service
            .list_products(ListProductsRequest {
                page_no: Some(0),
                ..Default::default()
            })
            .await;
        assert!(matches!(rejected, Err(AppError::BadRequest(_))));
    }
}
