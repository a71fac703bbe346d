use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request DTO for creating a brand
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandDto {
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

/// Response DTO for brand
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandResponseDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Paragraph;
    use fake::Fake;

    fn dto(slug: &str) -> CreateBrandDto {
        CreateBrandDto {
            slug: slug.to_string(),
            name: "Acme".to_string(),
            description: Some(Paragraph(1..3).fake()),
        }
    }

    #[test]
    fn test_valid_brand() {
        assert!(dto("acme-audio").validate().is_ok());
    }

    #[test]
    fn test_brand_slug_is_a_single_segment() {
        assert!(dto("acme/audio").validate().is_err());
        assert!(dto("Acme").validate().is_err());
        assert!(dto("").validate().is_err());
        assert!(dto(&"a".repeat(51)).validate().is_err());
    }

    #[test]
    fn test_description_limit() {
        let mut dto = dto("acme");
        dto.description = Some("d".repeat(2001));
        assert!(dto.validate().is_err());
    }
}
