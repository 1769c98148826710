use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::models::Product;

/// A scalar taken from a loosely-typed filter payload, kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Number(Decimal),
}

impl FilterValue {
    /// Whether the value counts as "present" for a scalar filter field.
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Bool(b) => *b,
            FilterValue::Int(n) => *n != 0,
            FilterValue::Text(s) => !s.is_empty(),
            FilterValue::Number(n) => !n.is_zero(),
        }
    }

    pub fn as_id(&self) -> Option<i32> {
        match self {
            FilterValue::Int(n) => i32::try_from(*n).ok(),
            FilterValue::Text(s) => s.trim().parse().ok(),
            FilterValue::Number(n) if n.fract().is_zero() => n.to_i32(),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FilterValue::Int(n) => Some(Decimal::from(*n)),
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => s.trim().parse().ok(),
            FilterValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Int(n) => write!(f, "{}", n),
            FilterValue::Text(s) => write!(f, "{}", s),
            FilterValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One picked option of a multi-select, e.g. `{ "value": 4, "label": "Shoes" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub value: FilterValue,
}

/// Storefront listing filters. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductFilters {
    #[serde(default)]
    pub categories: Option<Vec<Selection>>,
    #[serde(default)]
    pub brands: Option<Vec<Selection>>,
    #[serde(default, alias = "priceRangeTo")]
    pub price_range_to: Option<FilterValue>,
    #[serde(default)]
    pub gender: Option<FilterValue>,
    #[serde(default)]
    pub occasions: Option<Vec<Selection>>,
    #[serde(default)]
    pub discount: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    CreatedAsc,
    CreatedDesc,
    RatingAsc,
    RatingDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Price,
    CreatedAt,
    Rating,
}

impl SortBy {
    /// Unknown keys yield `None`, leaving row order unspecified.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "price-asc" => Some(SortBy::PriceAsc),
            "price-desc" => Some(SortBy::PriceDesc),
            "created-asc" | "created_at-asc" => Some(SortBy::CreatedAsc),
            "created-desc" | "created_at-desc" => Some(SortBy::CreatedDesc),
            "rating-asc" => Some(SortBy::RatingAsc),
            "rating-desc" => Some(SortBy::RatingDesc),
            _ => None,
        }
    }

    pub fn column(self) -> SortColumn {
        match self {
            SortBy::PriceAsc | SortBy::PriceDesc => SortColumn::Price,
            SortBy::CreatedAsc | SortBy::CreatedDesc => SortColumn::CreatedAt,
            SortBy::RatingAsc | SortBy::RatingDesc => SortColumn::Rating,
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(
            self,
            SortBy::PriceDesc | SortBy::CreatedDesc | SortBy::RatingDesc
        )
    }
}

impl SortColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Price => "products.price",
            SortColumn::CreatedAt => "products.created_at",
            SortColumn::Rating => "products.rating",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsRequest {
    #[serde(default, alias = "pageNo")]
    pub page_no: Option<i64>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<i64>,
    #[serde(default, alias = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub filters: ProductFilters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub count: i64,
    pub last_page: i64,
    pub num_of_results_on_cur_page: usize,
}
