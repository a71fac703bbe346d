//! Products, each belonging to one brand and one category.
//!
//! The category is referenced by its full path on input and rendered the same
//! way on output.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/products` | No | Create product |
//! | GET | `/api/products/{slug}` | No | Find product by slug |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ProductService;
