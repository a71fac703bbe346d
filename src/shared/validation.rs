use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating a single slug (brand, product, one category segment)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "acme", "noise-cancelling", "x1"
    /// - Invalid: "-acme", "acme-", "acme--co", "Acme", "acme_co", "a/b"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for validating a full category path: slugs joined by single slashes
    /// - Valid: "electronics", "electronics/audio/headphones"
    /// - Invalid: "/electronics", "electronics/", "electronics//audio", "Electronics"
    pub static ref CATEGORY_PATH_REGEX: Regex =
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*(?:/[a-z0-9]+(?:-[a-z0-9]+)*)*$").unwrap();
}
