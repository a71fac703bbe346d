mod category_dto;

pub use category_dto::{CategoryPathDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto};
