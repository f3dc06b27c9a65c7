pub mod catalog;
pub mod pricing;

pub use catalog::{Catalog, CatalogError};
pub use pricing::PriceCalculator;
