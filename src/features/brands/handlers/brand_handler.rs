use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::brands::dtos::{BrandResponseDto, CreateBrandDto};
use crate::features::brands::services::BrandService;
use crate::shared::types::ApiResponse;

/// Create a brand
#[utoipa::path(
    post,
    path = "/api/brands",
    request_body = CreateBrandDto,
    responses(
        (status = 201, description = "Brand created", body = ApiResponse<BrandResponseDto>),
        (status = 400, description = "Validation error or duplicate slug/name")
    ),
    tag = "brands"
)]
pub async fn create_brand(
    State(service): State<Arc<BrandService>>,
    AppJson(dto): AppJson<CreateBrandDto>,
) -> Result<(
    StatusCode,
    [(header::HeaderName, String); 1],
    Json<ApiResponse<BrandResponseDto>>,
)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand = service.create(dto).await?;
    let location = format!("/api/brands/{}", brand.slug);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(Some(brand), None, None)),
    ))
}

/// Get brand by slug
#[utoipa::path(
    get,
    path = "/api/brands/{slug}",
    params(
        ("slug" = String, Path, description = "Brand slug")
    ),
    responses(
        (status = 200, description = "Brand found", body = ApiResponse<BrandResponseDto>),
        (status = 404, description = "Brand not found")
    ),
    tag = "brands"
)]
pub async fn get_brand(
    State(service): State<Arc<BrandService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<BrandResponseDto>>> {
    let brand = service.find_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(brand), None, None)))
}
