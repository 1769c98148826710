use sqlx::{PgConnection, PgPool, types::Json};

use crate::{
    error::Result,
    models::{DeleteSummary, NewProduct, Product, UpdateProductRequest},
    queries::listing::ListingQuery,
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn count_products(pool: &PgPool, listing: &ListingQuery) -> Result<i64> {
    let mut query = listing.count_query();
    let count = query.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(count)
}

pub async fn fetch_page(pool: &PgPool, listing: &ListingQuery) -> Result<Vec<Product>> {
    let mut query = listing.page_query();
    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

pub async fn insert_product(pool: &PgPool, row: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (
            name, description, price, old_price, discount, rating,
            colors, brands, gender, occasion, image_url
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(&row.name)
    .bind(&row.description)
    .bind(row.price)
    .bind(row.old_price)
    .bind(row.discount)
    .bind(row.rating)
    .bind(&row.colors)
    .bind(Json(&row.brands))
    .bind(&row.gender)
    .bind(&row.occasion)
    .bind(&row.image_url)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Overwrites every mutable column. `price` keeps its insert-time value.
pub async fn update_product(
    conn: &mut PgConnection,
    id: i32,
    req: &UpdateProductRequest,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET
            name = $1,
            description = $2,
            old_price = $3,
            discount = $4,
            rating = $5,
            colors = $6,
            brands = $7,
            gender = $8,
            occasion = $9,
            image_url = $10
        WHERE id = $11
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.old_price)
    .bind(req.discount)
    .bind(req.rating)
    .bind(&req.colors)
    .bind(Json(&req.brands))
    .bind(&req.gender)
    .bind(&req.occasion)
    .bind(&req.image_url)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Removes a product after its category links, reviews and comments.
pub async fn delete_product_cascade(conn: &mut PgConnection, id: i32) -> Result<DeleteSummary> {
    let product_categories = sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let reviews = sqlx::query("DELETE FROM reviews WHERE product_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let comments = sqlx::query("DELETE FROM comments WHERE product_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let products = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(DeleteSummary {
        product_categories,
        reviews,
        comments,
        products,
    })
}
