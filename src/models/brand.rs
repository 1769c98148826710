use serde::{Deserialize, Serialize};

use crate::models::LookupKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BrandNamesRequest {
    pub ids: Vec<LookupKey>,
}
