use utoipa::{Modify, OpenApi};

use crate::features::brands::{dtos as brands_dtos, handlers as brands_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::create_category,
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Brands
        brands_handlers::create_brand,
        brands_handlers::get_brand,
        // Products
        products_handlers::create_product,
        products_handlers::get_product,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryPathDto,
            categories_dtos::CategoryTreeDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryPathDto>>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            // Brands
            brands_dtos::CreateBrandDto,
            brands_dtos::BrandResponseDto,
            ApiResponse<brands_dtos::BrandResponseDto>,
            // Products
            products_dtos::CreateProductDto,
            products_dtos::ProductResponseDto,
            ApiResponse<products_dtos::ProductResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Hierarchical product categories addressed by full slug path"),
        (name = "brands", description = "Product brands"),
        (name = "products", description = "Products with brand and category"),
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "API documentation for the product catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
