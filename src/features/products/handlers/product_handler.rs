use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::products::dtos::{CreateProductDto, ProductResponseDto};
use crate::features::products::services::ProductService;
use crate::shared::types::ApiResponse;

/// Create a product
///
/// `categorySlug` is the full path of an existing category.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error, duplicate slug/name, or unknown brand/category")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<(
    StatusCode,
    [(header::HeaderName, String); 1],
    Json<ApiResponse<ProductResponseDto>>,
)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = service.create(dto).await?;
    let location = format!("/api/products/{}", product.slug);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(Some(product), None, None)),
    ))
}

/// Get product by slug
#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.find_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}
