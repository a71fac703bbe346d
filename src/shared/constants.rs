/// Maximum length of a single slug segment (brand, product, category segment)
pub const SLUG_MAX_LENGTH: usize = 50;

/// Maximum length of a full category path, separators included
pub const CATEGORY_PATH_MAX_LENGTH: usize = 255;

/// Separator between segments of a category path
pub const CATEGORY_PATH_SEPARATOR: char = '/';
