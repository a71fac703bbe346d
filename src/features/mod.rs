pub mod brands;
pub mod categories;
pub mod products;
