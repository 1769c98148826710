use sqlx::{Postgres, QueryBuilder};

use crate::{
    error::{AppError, Result},
    models::{ProductFilters, SortBy},
    queries::{filter_clause::build_predicate, predicate::Predicate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_no: i64,
    pub page_size: i64,
}

impl PageWindow {
    pub fn new(page_no: i64, page_size: i64) -> Result<Self> {
        if page_no < 1 {
            return Err(AppError::BadRequest(
                "page_no must be at least 1".to_string(),
            ));
        }
        if page_size < 1 {
            return Err(AppError::BadRequest(
                "page_size must be positive".to_string(),
            ));
        }
        Ok(Self { page_no, page_size })
    }

    pub fn offset(self) -> i64 {
        (self.page_no - 1).saturating_mul(self.page_size)
    }

    /// `ceil(count / page_size)`; zero when nothing matched.
    pub fn last_page(self, count: i64) -> i64 {
        if count <= 0 {
            return 0;
        }
        (count + self.page_size - 1) / self.page_size
    }
}

/// One listing request. The count and page queries are both rendered from
/// `predicate`, so they always filter identically.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub predicate: Predicate,
    pub sort: Option<SortBy>,
    pub window: PageWindow,
}

impl ListingQuery {
    pub fn new(filters: &ProductFilters, sort_by: Option<&str>, window: PageWindow) -> Self {
        Self {
            predicate: build_predicate(filters),
            sort: sort_by.and_then(SortBy::parse),
            window,
        }
    }

    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM products");
        self.predicate.push_where(&mut query);
        query
    }

    pub fn page_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT DISTINCT products.* FROM products");
        self.predicate.push_where(&mut query);

        if let Some(sort) = self.sort {
            query.push(" ORDER BY ");
            query.push(sort.column().as_sql());
            query.push(if sort.is_descending() { " DESC" } else { " ASC" });
        }

        query.push(" LIMIT ");
        query.push_bind(self.window.page_size);
        query.push(" OFFSET ");
        query.push_bind(self.window.offset());

        query
    }
}
