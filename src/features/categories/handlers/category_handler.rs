use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryPathDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing categories
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Create a category
///
/// `slug` is the full path of the new category. Its parent path must exist.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Invalid slug, duplicate slug or name, or missing parent")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(
    StatusCode,
    [(header::HeaderName, String); 1],
    Json<ApiResponse<CategoryResponseDto>>,
)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    let location = format!("/api/categories/{}", category.slug);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// List all categories
///
/// Returns categories in pre-order as flat list, or nested when `tree=true`.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryPathDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let (value, total) = if query.tree {
        let tree: Vec<CategoryTreeDto> = service.list_tree().await?;
        let total = tree.len();
        (serde_json::to_value(tree), total)
    } else {
        let categories = service.list().await?;
        let total = categories.len();
        (serde_json::to_value(categories), total)
    };
    let value = value.map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        Some(value),
        None,
        Some(Meta {
            total: total as i64,
        }),
    )))
}

/// Get category by full path
#[utoipa::path(
    get,
    path = "/api/categories/{path}",
    params(
        ("path" = String, Path, description = "Full category path, e.g. electronics/audio")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(path): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.find_by_full_path(&path).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}
