pub mod brand_queries;
pub mod category_queries;
pub mod filter_clause;
pub mod listing;
pub mod predicate;
pub mod products_queries;

pub use listing::{ListingQuery, PageWindow};
pub use predicate::{Column, Predicate};
