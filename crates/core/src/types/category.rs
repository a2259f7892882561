//! Product categories and the catalog's category filter.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string names no known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothes,
    Accessories,
    Furniture,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Electronics,
        Self::Clothes,
        Self::Accessories,
        Self::Furniture,
    ];

    /// Display name, as used in links and the category menu.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothes => "Clothes",
            Self::Accessories => "Accessories",
            Self::Furniture => "Furniture",
        }
    }

    /// Whether a product's category string names this category.
    ///
    /// The marketplace API is not consistent about casing, so the
    /// comparison ignores it.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        category.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.matches(s))
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

/// Category restriction applied to a catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// No restriction.
    #[default]
    All,
    /// Only products in the given category.
    Only(Category),
}

impl CategoryFilter {
    /// Label of the unrestricted option.
    pub const ALL_LABEL: &'static str = "All";

    /// Read a filter from a query-string value.
    ///
    /// Empty and unrecognised values fall back to [`CategoryFilter::All`].
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse::<Category>().ok())
            .map_or(Self::All, Self::Only)
    }

    /// Whether a product's category string passes this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.matches(category),
        }
    }

    /// Whether this filter restricts anything.
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        matches!(self, Self::Only(_))
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(category) => category.as_str(),
        }
    }

    /// Every selectable option, "All" first.
    #[must_use]
    pub fn options() -> Vec<Self> {
        core::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("electronics".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!("FURNITURE".parse::<Category>().unwrap(), Category::Furniture);
        assert!("Toys".parse::<Category>().is_err());
    }

    #[test]
    fn test_filter_parse_lenient() {
        assert_eq!(CategoryFilter::parse_lenient(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse_lenient(Some("")), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse_lenient(Some("All")), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse_lenient(Some("Toys")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse_lenient(Some("Clothes")),
            CategoryFilter::Only(Category::Clothes)
        );
    }

    #[test]
    fn test_filter_matches() {
        let filter = CategoryFilter::Only(Category::Electronics);
        assert!(filter.matches("electronics"));
        assert!(filter.matches("Electronics"));
        assert!(!filter.matches("clothes"));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn test_options_order() {
        let labels: Vec<_> = CategoryFilter::options().iter().map(CategoryFilter::label).collect();
        assert_eq!(
            labels,
            ["All", "Electronics", "Clothes", "Accessories", "Furniture"]
        );
    }
}
