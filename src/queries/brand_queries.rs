use sqlx::PgPool;

use crate::{error::Result, models::Brand};

pub async fn get_all(pool: &PgPool) -> Result<Vec<Brand>> {
    let brands = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands ORDER BY name ASC, id ASC")
        .fetch_all(pool)
        .await?;

    Ok(brands)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Brand>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let brands = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(brands)
}
