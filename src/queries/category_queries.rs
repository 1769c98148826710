use sqlx::{PgConnection, PgPool};

use crate::{
    error::Result,
    models::{Category, ProductCategoryName},
};

/// Get all categories ordered by name
pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(pool)
            .await?;

    Ok(categories)
}

/// Get categories for a specific product
pub async fn get_product_categories(pool: &PgPool, product_id: i32) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT c.id, c.name FROM product_categories pc
         INNER JOIN categories c ON c.id = pc.category_id
         WHERE pc.product_id = $1
         ORDER BY c.id ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Get categories for many products in one round trip
pub async fn get_categories_for_products(
    pool: &PgPool,
    product_ids: &[i32],
) -> Result<Vec<ProductCategoryName>> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, ProductCategoryName>(
        "SELECT pc.product_id, c.id, c.name FROM product_categories pc
         INNER JOIN categories c ON c.id = pc.category_id
         WHERE pc.product_id = ANY($1)
         ORDER BY pc.product_id ASC, c.id ASC",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Replace a product's category links
pub async fn replace_product_categories(
    conn: &mut PgConnection,
    product_id: i32,
    category_ids: &[i32],
) -> Result<()> {
    sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if !category_ids.is_empty() {
        let mut query_builder =
            sqlx::QueryBuilder::new("INSERT INTO product_categories (product_id, category_id) ");

        query_builder.push_values(category_ids, |mut b, category_id| {
            b.push_bind(product_id).push_bind(*category_id);
        });

        query_builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}
