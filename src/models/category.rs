use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductCategory {
    pub product_id: i32,
    pub category_id: i32,
}

/// A category row tagged with the product it was joined through.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductCategoryName {
    pub product_id: i32,
    #[sqlx(flatten)]
    pub category: Category,
}
