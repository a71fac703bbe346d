use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub category_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row joined with its brand's slug
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithBrand {
    #[sqlx(flatten)]
    pub product: Product,
    pub brand_slug: String,
}
