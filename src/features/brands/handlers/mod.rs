pub mod brand_handler;

pub use brand_handler::{__path_create_brand, __path_get_brand, create_brand, get_brand};
