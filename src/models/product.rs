use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::{
    error::{AppError, Result},
    models::Selection,
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub old_price: Decimal,
    pub discount: Decimal,
    pub rating: Decimal,
    pub colors: Vec<String>,
    pub brands: Json<Vec<i32>>,
    pub brand_id: Option<i32>,
    pub gender: String,
    pub occasion: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sale price after applying a percentage discount, rounded to cents.
pub fn derive_price(old_price: Decimal, discount: Decimal) -> Result<Decimal> {
    let out_of_range = || {
        AppError::BadRequest(format!(
            "Price out of range: old_price {} with discount {}",
            old_price, discount
        ))
    };

    let markdown = old_price
        .checked_mul(discount / Decimal::ONE_HUNDRED)
        .ok_or_else(out_of_range)?;
    let mut price = old_price
        .checked_sub(markdown)
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);

    Ok(price)
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub old_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub brands: Vec<Selection>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub occasion: Vec<Selection>,
    pub image_url: Option<String>,
}

/// Column values written by an insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub old_price: Decimal,
    pub discount: Decimal,
    pub rating: Decimal,
    pub colors: Vec<String>,
    pub brands: Vec<i32>,
    pub gender: String,
    pub occasion: String,
    pub image_url: Option<String>,
}

impl TryFrom<InsertProductRequest> for NewProduct {
    type Error = AppError;

    fn try_from(req: InsertProductRequest) -> Result<Self> {
        let brands = req
            .brands
            .iter()
            .map(|brand| {
                brand.value.as_id().ok_or_else(|| {
                    AppError::BadRequest(format!("Invalid brand id: {}", brand.value))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let occasion = req
            .occasion
            .iter()
            .map(|occ| occ.value.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            price: derive_price(req.old_price, req.discount)?,
            name: req.name,
            description: req.description,
            old_price: req.old_price,
            discount: req.discount,
            rating: req.rating,
            colors: req.colors,
            brands,
            gender: req.gender,
            occasion,
            image_url: req.image_url,
        })
    }
}

/// Full overwrite of a product's mutable columns. `price` is not touched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub old_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub brands: Vec<i32>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub occasion: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoriesRequest {
    pub category_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductIdRef {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct BatchCategoriesRequest {
    pub products: Vec<ProductIdRef>,
}

/// Rows removed by a product delete, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub product_categories: u64,
    pub reviews: u64,
    pub comments: u64,
    pub products: u64,
}
