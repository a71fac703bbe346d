use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::brands::dtos::BrandResponseDto;

/// Database model for brand
#[derive(Debug, Clone, FromRow)]
pub struct Brand {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Brand> for BrandResponseDto {
    fn from(b: Brand) -> Self {
        Self {
            id: b.id,
            slug: b.slug,
            name: b.name,
            description: b.description,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
