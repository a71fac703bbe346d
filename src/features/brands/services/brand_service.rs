use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{unique_violation, AppError, Result};
use crate::features::brands::dtos::{BrandResponseDto, CreateBrandDto};
use crate::features::brands::models::Brand;

pub const SLUG_CONSTRAINT: &str = "uq_brands_slug";
pub const NAME_CONSTRAINT: &str = "uq_brands_name";

/// Translate a failed brand write; a lost uniqueness race reads like the pre-check.
fn handle_db_error(e: sqlx::Error) -> AppError {
    match unique_violation(&e) {
        Some(SLUG_CONSTRAINT) => AppError::Validation("Slug already exists".to_string()),
        Some(NAME_CONSTRAINT) => AppError::Validation("Name already exists".to_string()),
        _ => {
            tracing::error!("Failed to create brand: {:?}", e);
            AppError::Database(e)
        }
    }
}

/// Service for brand operations
pub struct BrandService {
    pool: PgPool,
}

impl BrandService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new brand with globally unique slug and name
    pub async fn create(&self, dto: CreateBrandDto) -> Result<BrandResponseDto> {
        let (slug_taken, name_taken) = sqlx::query_as::<_, (bool, bool)>(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM brands WHERE slug = $1),
                EXISTS (SELECT 1 FROM brands WHERE name = $2)
            "#,
        )
        .bind(&dto.slug)
        .bind(&dto.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check brand uniqueness: {:?}", e);
            AppError::Database(e)
        })?;

        if slug_taken {
            return Err(AppError::Validation("Slug already exists".to_string()));
        }
        if name_taken {
            return Err(AppError::Validation("Name already exists".to_string()));
        }

        let brand = sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (id, slug, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, slug, name, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&dto.slug)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!("Brand created: id={}, slug={}", brand.id, brand.slug);

        Ok(brand.into())
    }

    /// Get brand by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<BrandResponseDto> {
        self.fetch_by_slug(slug)
            .await?
            .map(BrandResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Brand '{}' not found", slug)))
    }

    /// Brand lookup that leaves the not-found decision to the caller
    pub async fn fetch_by_slug(&self, slug: &str) -> Result<Option<Brand>> {
        sqlx::query_as::<_, Brand>(
            r#"
            SELECT id, slug, name, description, created_at, updated_at
            FROM brands
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get brand by slug: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::unique_violation_error;

    #[test]
    fn test_lost_uniqueness_race_reads_like_pre_check() {
        assert!(matches!(
            handle_db_error(unique_violation_error(SLUG_CONSTRAINT)),
            AppError::Validation(msg) if msg == "Slug already exists"
        ));
        assert!(matches!(
            handle_db_error(unique_violation_error(NAME_CONSTRAINT)),
            AppError::Validation(msg) if msg == "Name already exists"
        ));
    }

    #[test]
    fn test_unknown_constraint_stays_database_error() {
        assert!(matches!(
            handle_db_error(unique_violation_error("uq_products_slug")),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        assert!(matches!(
            handle_db_error(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }
}
