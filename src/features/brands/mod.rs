//! Brands referenced by products.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/brands` | No | Create brand |
//! | GET | `/api/brands/{slug}` | No | Find brand by slug |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::BrandService;
