mod brand_dto;

pub use brand_dto::{BrandResponseDto, CreateBrandDto};
