pub mod extractors;

pub use extractors::{AppJson, AppPath, AppQuery};
