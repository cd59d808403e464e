mod catalog;
mod color;
mod product;

pub use catalog::{Catalog, SqlCatalog};
pub use color::{Color, ColorImage, ImageField};
pub use product::{Product, ProductFilter};
