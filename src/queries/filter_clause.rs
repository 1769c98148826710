use crate::{
    models::{FilterValue, ProductFilters, Selection},
    queries::predicate::{Column, Predicate},
};

/// Builds the listing predicate: one fragment per present filter field, ANDed.
pub fn build_predicate(filters: &ProductFilters) -> Predicate {
    let mut fragments = Vec::new();

    if let Some(categories) = non_empty(&filters.categories) {
        fragments.push(Predicate::InCategories(values(categories)));
    }

    if let Some(brands) = non_empty(&filters.brands) {
        fragments.push(Predicate::In(Column::BrandId, values(brands)));
    }

    if let Some(max_price) = filters.price_range_to.as_ref().filter(|v| v.is_truthy()) {
        fragments.push(Predicate::AtMost(Column::Price, max_price.clone()));
    }

    if let Some(gender) = filters.gender.as_ref().filter(|v| v.is_truthy()) {
        fragments.push(Predicate::Equals(Column::Gender, gender.clone()));
    }

    if let Some(occasions) = non_empty(&filters.occasions) {
        fragments.push(Predicate::In(Column::Occasion, values(occasions)));
    }

    if let Some(discount) = filters.discount.as_deref().filter(|d| !d.is_empty()) {
        let (from, to) = split_range(discount);
        fragments.push(Predicate::Between(
            Column::Discount,
            FilterValue::Text(from.to_string()),
            FilterValue::Text(to.to_string()),
        ));
    }

    Predicate::And(fragments)
}

fn non_empty(selections: &Option<Vec<Selection>>) -> Option<&[Selection]> {
    selections.as_deref().filter(|s| !s.is_empty())
}

fn values(selections: &[Selection]) -> Vec<FilterValue> {
    selections.iter().map(|s| s.value.clone()).collect()
}

/// Splits `"from-to"` on `-`; a missing upper half is empty.
fn split_range(range: &str) -> (&str, &str) {
    let mut parts = range.split('-');
    let from = parts.next().unwrap_or_default();
    let to = parts.next().unwrap_or_default();
    (from, to)
}
