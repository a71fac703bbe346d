use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, unique_violation, AppError, Result};
use crate::features::brands::BrandService;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::{CategoryError, CategoryService};
use crate::features::products::dtos::{CreateProductDto, ProductResponseDto};
use crate::features::products::models::{Product, ProductWithBrand};

pub const SLUG_CONSTRAINT: &str = "uq_products_slug";
pub const NAME_CONSTRAINT: &str = "uq_products_name";

fn handle_db_error(e: sqlx::Error) -> AppError {
    match unique_violation(&e) {
        Some(SLUG_CONSTRAINT) => return AppError::Validation("Slug already exists".to_string()),
        Some(NAME_CONSTRAINT) => return AppError::Validation("Name already exists".to_string()),
        _ => {}
    }
    if is_foreign_key_violation(&e) {
        return AppError::BadRequest("Referenced brand or category does not exist".to_string());
    }
    tracing::error!("Failed to create product: {:?}", e);
    AppError::Database(e)
}

/// Resolve the product's category by full path; a miss is an input error.
async fn resolve_category(
    categories: &CategoryService,
    full_path: &str,
) -> Result<CategoryResponseDto> {
    categories
        .find_by_full_path(full_path)
        .await
        .map_err(|e| match e {
            CategoryError::NotFound(_) => {
                AppError::Validation("Category slug does not exist".to_string())
            }
            other => AppError::from(other),
        })
}

/// Service for product operations
pub struct ProductService {
    pool: PgPool,
    brands: Arc<BrandService>,
    categories: Arc<CategoryService>,
}

impl ProductService {
    pub fn new(pool: PgPool, brands: Arc<BrandService>, categories: Arc<CategoryService>) -> Self {
        Self {
            pool,
            brands,
            categories,
        }
    }

    /// Create a product under an existing brand and category
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        let (slug_taken, name_taken) = sqlx::query_as::<_, (bool, bool)>(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM products WHERE slug = $1),
                EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(&dto.slug)
        .bind(&dto.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check product uniqueness: {:?}", e);
            AppError::Database(e)
        })?;

        if slug_taken {
            return Err(AppError::Validation("Slug already exists".to_string()));
        }
        if name_taken {
            return Err(AppError::Validation("Name already exists".to_string()));
        }

        let brand = self
            .brands
            .fetch_by_slug(&dto.brand_slug)
            .await?
            .ok_or_else(|| AppError::Validation("Brand slug does not exist".to_string()))?;

        let category = resolve_category(&self.categories, &dto.category_slug).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, brand_id, category_id, slug, name, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, brand_id, category_id, slug, name, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(brand.id)
        .bind(category.id)
        .bind(&dto.slug)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!(
            "Product created: id={}, slug={}, category={}",
            product.id,
            product.slug,
            category.slug
        );

        Ok(ProductResponseDto::from_product(
            product,
            brand.slug,
            category.slug,
        ))
    }

    /// Get product by slug, with its category rendered as full path
    pub async fn find_by_slug(&self, slug: &str) -> Result<ProductResponseDto> {
        let row = sqlx::query_as::<_, ProductWithBrand>(
            r#"
            SELECT p.id, p.brand_id, p.category_id, p.slug, p.name, p.description,
                   p.created_at, p.updated_at, b.slug AS brand_slug
            FROM products p
            JOIN brands b ON b.id = p.brand_id
            WHERE p.slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product by slug: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", slug)))?;

        let category_slug = self.categories.full_path_of(row.product.category_id).await?;

        Ok(ProductResponseDto::from_product(
            row.product,
            row.brand_slug,
            category_slug,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        dangling_category_service, foreign_key_violation_error, memory_category_service,
        seed_fixture_tree, unique_violation_error,
    };

    #[test]
    fn test_constraint_violations_translate_by_name() {
        assert!(matches!(
            handle_db_error(unique_violation_error(SLUG_CONSTRAINT)),
            AppError::Validation(msg) if msg == "Slug already exists"
        ));
        assert!(matches!(
            handle_db_error(unique_violation_error(NAME_CONSTRAINT)),
            AppError::Validation(msg) if msg == "Name already exists"
        ));
        assert!(matches!(
            handle_db_error(foreign_key_violation_error("products_category_id_fkey")),
            AppError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_resolve_category_by_full_path() {
        let categories = memory_category_service();
        seed_fixture_tree(&categories).await;

        let category = resolve_category(&categories, "category-2/category-2-1")
            .await
            .unwrap();
        assert_eq!(category.slug, "category-2/category-2-1");
    }

    #[tokio::test]
    async fn test_missing_category_is_an_input_error() {
        let categories = memory_category_service();
        seed_fixture_tree(&categories).await;

        assert!(matches!(
            resolve_category(&categories, "category-3").await,
            Err(AppError::Validation(msg)) if msg == "Category slug does not exist"
        ));
        // Only the exact path counts, not a prefix of one
        assert!(matches!(
            resolve_category(&categories, "category-2/category").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_other_category_failures_pass_through() {
        let categories = dangling_category_service().await;
        assert!(matches!(
            resolve_category(&categories, "category-1").await,
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_plain_errors_stay_database_errors() {
        assert!(matches!(
            handle_db_error(sqlx::Error::PoolClosed),
            AppError::Database(_)
        ));
    }
}
