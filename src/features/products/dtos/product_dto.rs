use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::products::models::Product;

/// Request DTO for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    #[validate(
        length(min = 1, max = 50, message = "Brand slug must be 1-50 characters"),
        regex(
            path = "*crate::shared::validation::SLUG_REGEX",
            message = "Brand slug must be lowercase words joined by hyphens"
        )
    )]
    pub brand_slug: String,

    /// Full path of the category
    #[validate(
        length(min = 1, max = 255, message = "Category slug must be 1-255 characters"),
        regex(
            path = "*crate::shared::validation::CATEGORY_PATH_REGEX",
            message = "Category slug must be lowercase words joined by hyphens, segments separated by '/'"
        )
    )]
    pub category_slug: String,

    #[validate(
        length(min = 1, max = 50, message = "Slug must be 1-50 characters"),
        regex(
            path = "*crate::shared::validation::SLUG_REGEX",
            message = "Slug must be lowercase words joined by hyphens"
        )
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
}

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub brand_slug: String,
    /// Full path of the category
    pub category_slug: String,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponseDto {
    pub fn from_product(p: Product, brand_slug: String, category_slug: String) -> Self {
        Self {
            id: p.id,
            brand_slug,
            category_slug,
            slug: p.slug,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn dto() -> CreateProductDto {
        CreateProductDto {
            brand_slug: "acme".to_string(),
            category_slug: "electronics/audio/headphones".to_string(),
            slug: "acme-h1".to_string(),
            name: "Acme H1".to_string(),
            description: Some(Sentence(4..10).fake()),
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_category_slug_may_be_a_path_but_brand_slug_may_not() {
        let mut product = dto();
        product.brand_slug = "acme/audio".to_string();
        assert!(product.validate().is_err());

        let mut product = dto();
        product.category_slug = "electronics//audio".to_string();
        assert!(product.validate().is_err());

        let mut product = dto();
        product.slug = "acme/h1".to_string();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_deserializes_camel_case() {
        let product: CreateProductDto = serde_json::from_value(serde_json::json!({
            "brandSlug": "acme",
            "categorySlug": "electronics",
            "slug": "acme-h1",
            "name": "Acme H1"
        }))
        .unwrap();
        assert_eq!(product.category_slug, "electronics");
        assert!(product.validate().is_ok());
    }
}
