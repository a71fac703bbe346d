pub mod product_handler;

pub use product_handler::{__path_create_product, __path_get_product, create_product, get_product};
