use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::brands::handlers;
use crate::features::brands::services::BrandService;

/// Create routes for the brands feature
pub fn routes(service: Arc<BrandService>) -> Router {
    Router::new()
        .route("/api/brands", post(handlers::create_brand))
        .route("/api/brands/{slug}", get(handlers::get_brand))
        .with_state(service)
}
