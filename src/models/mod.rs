mod brand;
mod category;
mod filters;
mod lookup;
mod product;
mod review;

pub use brand::*;
pub use category::*;
pub use filters::*;
pub use lookup::*;
pub use product::*;
pub use review::*;
