pub mod catalog_service;
pub mod revalidate_service;

pub use catalog_service::{ActionMessage, CatalogService};
pub use revalidate_service::{
    HttpRevalidator, NoopRevalidator, RecordingRevalidator, Revalidator,
};
