use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    error::{AppError, Result},
    models::{FilterValue, Product},
};

/// Product columns a listing filter can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    BrandId,
    Price,
    Discount,
    Gender,
    Occasion,
}

impl Column {
    pub fn as_sql(self) -> &'static str {
        match self {
            Column::Id => "products.id",
            Column::BrandId => "products.brand_id",
            Column::Price => "products.price",
            Column::Discount => "products.discount",
            Column::Gender => "products.gender",
            Column::Occasion => "products.occasion",
        }
    }

    fn sql_type(self) -> &'static str {
        match self {
            Column::Id | Column::BrandId => "integer",
            Column::Price | Column::Discount => "numeric",
            Column::Gender | Column::Occasion => "text",
        }
    }

    fn is_numeric(self) -> bool {
        !matches!(self, Column::Gender | Column::Occasion)
    }
}

/// Typed filter expression over `products`.
///
/// Rendered to SQL with every value as a bound parameter cast to the column
/// type, or evaluated directly against a [`Product`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(Column, FilterValue),
    AtMost(Column, FilterValue),
    In(Column, Vec<FilterValue>),
    Between(Column, FilterValue, FilterValue),
    /// Product is linked to any of the given category ids.
    InCategories(Vec<FilterValue>),
    And(Vec<Predicate>),
}

impl Predicate {
    /// Matches every product.
    pub fn all() -> Self {
        Predicate::And(Vec::new())
    }

    pub fn is_unconstrained(&self) -> bool {
        match self {
            Predicate::And(parts) => parts.iter().all(Predicate::is_unconstrained),
            _ => false,
        }
    }

    /// Appends ` WHERE <predicate>` unless the predicate matches everything.
    pub fn push_where(&self, query: &mut QueryBuilder<'_, Postgres>) {
        if self.is_unconstrained() {
            return;
        }
        query.push(" WHERE ");
        self.push_sql(query);
    }

    pub fn push_sql(&self, query: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::Equals(column, value) => {
                query.push(column.as_sql()).push(" = ");
                push_value(query, *column, value);
            }
            Predicate::AtMost(column, value) => {
                query.push(column.as_sql()).push(" <= ");
                push_value(query, *column, value);
            }
            Predicate::In(column, values) => {
                if values.is_empty() {
                    query.push("FALSE");
                    return;
                }
                query.push(column.as_sql()).push(" IN (");
                push_list(query, *column, values);
                query.push(")");
            }
            Predicate::Between(column, from, to) => {
                query.push(column.as_sql()).push(" BETWEEN ");
                push_value(query, *column, from);
                query.push(" AND ");
                push_value(query, *column, to);
            }
            Predicate::InCategories(category_ids) => {
                if category_ids.is_empty() {
                    query.push("FALSE");
                    return;
                }
                query.push(
                    "products.id IN (SELECT product_id FROM product_categories WHERE category_id IN (",
                );
                push_list(query, Column::Id, category_ids);
                query.push("))");
            }
            Predicate::And(parts) => {
                let parts: Vec<&Predicate> =
                    parts.iter().filter(|p| !p.is_unconstrained()).collect();

                if parts.is_empty() {
                    query.push("TRUE");
                    return;
                }

                query.push("(");
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        query.push(" AND ");
                    }
                    part.push_sql(query);
                }
                query.push(")");
            }
        }
    }

    /// Evaluates the predicate against one product and its category ids.
    ///
    /// Values that cannot be read as the column's type fail the same way the
    /// SQL cast does.
    pub fn matches(&self, product: &Product, category_ids: &[i32]) -> Result<bool> {
        match self {
            Predicate::Equals(column, value) => equals(product, *column, value),
            Predicate::AtMost(column, value) => {
                let bound = numeric(*column, value)?;
                Ok(numeric_field(product, *column).is_some_and(|field| field <= bound))
            }
            Predicate::In(column, values) => {
                for value in values {
                    if equals(product, *column, value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Between(column, from, to) => {
                let from = numeric(*column, from)?;
                let to = numeric(*column, to)?;
                Ok(numeric_field(product, *column)
                    .is_some_and(|field| from <= field && field <= to))
            }
            Predicate::InCategories(ids) => {
                for id in ids {
                    let id = id.as_id().ok_or_else(|| invalid_input("integer", id))?;
                    if category_ids.contains(&id) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::And(parts) => {
                for part in parts {
                    if !part.matches(product, category_ids)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn push_value(query: &mut QueryBuilder<'_, Postgres>, column: Column, value: &FilterValue) {
    match value.clone() {
        FilterValue::Bool(b) => query.push_bind(b),
        FilterValue::Int(n) => query.push_bind(n),
        FilterValue::Text(s) => query.push_bind(s),
        FilterValue::Number(n) => query.push_bind(n),
    };
    query.push("::").push(column.sql_type());
}

fn push_list(query: &mut QueryBuilder<'_, Postgres>, column: Column, values: &[FilterValue]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            query.push(", ");
        }
        push_value(query, column, value);
    }
}

fn equals(product: &Product, column: Column, value: &FilterValue) -> Result<bool> {
    if column.is_numeric() {
        let expected = numeric(column, value)?;
        return Ok(numeric_field(product, column).is_some_and(|field| field == expected));
    }

    let field = match column {
        Column::Gender => product.gender.as_str(),
        _ => product.occasion.as_str(),
    };
    Ok(field == value.to_string())
}

fn numeric(column: Column, value: &FilterValue) -> Result<Decimal> {
    value
        .as_decimal()
        .ok_or_else(|| invalid_input(column.sql_type(), value))
}

fn numeric_field(product: &Product, column: Column) -> Option<Decimal> {
    match column {
        Column::Id => Some(Decimal::from(product.id)),
        Column::BrandId => product.brand_id.map(Decimal::from),
        Column::Price => Some(product.price),
        Column::Discount => Some(product.discount),
        Column::Gender | Column::Occasion => None,
    }
}

fn invalid_input(sql_type: &str, value: &FilterValue) -> AppError {
    AppError::BadRequest(format!(
        "invalid input syntax for type {}: \"{}\"",
        sql_type, value
    ))
}
