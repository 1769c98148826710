mod connection;
mod constraints;

pub use connection::{check_health, create_pool, run_migrations};
pub use constraints::ConstraintScope;
