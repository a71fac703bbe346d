//! Full category paths: validation and decomposition.

use std::fmt;

use crate::features::categories::error::CategoryError;
use crate::shared::constants::{
    CATEGORY_PATH_MAX_LENGTH, CATEGORY_PATH_SEPARATOR, SLUG_MAX_LENGTH,
};
use crate::shared::validation::SLUG_REGEX;

/// A validated, `/`-delimited category path such as `electronics/audio`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryPath(String);

impl CategoryPath {
    /// Validate `raw` against the slug-path grammar.
    ///
    /// Every segment must be a slug of at most 50 bytes; segments are joined
    /// by single separators, with none leading or trailing.
    pub fn parse(raw: &str) -> Result<Self, CategoryError> {
        if raw.is_empty() {
            return Err(CategoryError::InvalidPathFormat(
                "Slug must not be empty".to_string(),
            ));
        }
        if raw.len() > CATEGORY_PATH_MAX_LENGTH {
            return Err(CategoryError::InvalidPathFormat(format!(
                "Slug must not be longer than {} chars",
                CATEGORY_PATH_MAX_LENGTH
            )));
        }

        for segment in raw.split(CATEGORY_PATH_SEPARATOR) {
            if segment.is_empty() {
                return Err(CategoryError::InvalidPathFormat(format!(
                    "Slug '{}' contains an empty segment",
                    raw
                )));
            }
            if segment.len() > SLUG_MAX_LENGTH {
                return Err(CategoryError::InvalidPathFormat(format!(
                    "Slug segment '{}' must not be longer than {} chars",
                    segment, SLUG_MAX_LENGTH
                )));
            }
            if !SLUG_REGEX.is_match(segment) {
                return Err(CategoryError::InvalidPathFormat(format!(
                    "Slug segment '{}' must be lowercase alphanumeric words joined by hyphens",
                    segment
                )));
            }
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last separator, `None` for root-level paths
    pub fn parent(&self) -> Option<&str> {
        self.0
            .rsplit_once(CATEGORY_PATH_SEPARATOR)
            .map(|(parent, _)| parent)
    }

    /// The final segment, stored on the node itself
    pub fn own_slug(&self) -> &str {
        self.0
            .rsplit_once(CATEGORY_PATH_SEPARATOR)
            .map_or(self.0.as_str(), |(_, slug)| slug)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
