//! Catalog query resolution.
//!
//! A catalog listing is driven by two inputs, a category filter and a free
//! text search query. [`CatalogQuery::source`] decides which API listing to
//! fetch and [`CatalogQuery::resolve`] post-filters what came back:
//!
//! | category | query     | fetch            | post-filter          |
//! |----------|-----------|------------------|----------------------|
//! | All      | empty     | all products     | none                 |
//! | X        | empty     | all products     | category == X        |
//! | All      | non-empty | search candidates| none (API ranking)   |
//! | X        | non-empty | search candidates| category == X        |

use serde::{Deserialize, Serialize};

use crate::pagination::ReloadFactors;
use crate::types::{CategoryFilter, Product};

/// Which marketplace listing a catalog query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource<'a> {
    /// The full, unranked product list.
    AllProducts,
    /// Relevance-ranked candidates for the query.
    Search(&'a str),
}

/// A visitor's catalog inputs.
///
/// Serializable so the storefront can remember which listing a visitor was
/// last shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    category: CategoryFilter,
    search_query: String,
}

impl CatalogQuery {
    /// Build a query. The search text is kept as typed: any non-empty
    /// text, whitespace included, goes to the search endpoint.
    #[must_use]
    pub fn new(category: CategoryFilter, search_query: &str) -> Self {
        Self {
            category,
            search_query: search_query.to_owned(),
        }
    }

    /// The category filter.
    #[must_use]
    pub const fn category(&self) -> CategoryFilter {
        self.category
    }

    /// The search text (possibly empty).
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Which listing to fetch.
    #[must_use]
    pub fn source(&self) -> CatalogSource<'_> {
        if self.search_query.is_empty() {
            CatalogSource::AllProducts
        } else {
            CatalogSource::Search(&self.search_query)
        }
    }

    /// Apply the category filter to a fetched listing.
    ///
    /// Order is preserved and nothing is de-duplicated, so search ranking
    /// from the API survives.
    #[must_use]
    pub fn resolve(&self, fetched: Vec<Product>) -> Vec<Product> {
        filter_by_category(fetched, self.category)
    }

    /// Inputs whose change sends pagination back to page 1.
    #[must_use]
    pub fn reload_factors(&self) -> ReloadFactors {
        ReloadFactors::from_values(&[self.category.label(), &self.search_query])
    }
}

/// Keep the products whose category passes the filter.
#[must_use]
pub fn filter_by_category(products: Vec<Product>, filter: CategoryFilter) -> Vec<Product> {
    if !filter.is_restricted() {
        return products;
    }
    products
        .into_iter()
        .filter(|product| filter.matches(&product.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use crate::types::product::tests::product;

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "electronics"),
            product(2, "Clothes"),
            product(3, "ELECTRONICS"),
            product(4, "furniture"),
        ]
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.product_id.get()).collect()
    }

    #[test]
    fn test_all_and_empty_query_returns_everything() {
        let query = CatalogQuery::new(CategoryFilter::All, "");
        assert_eq!(query.source(), CatalogSource::AllProducts);
        assert_eq!(ids(&query.resolve(catalog())), [1, 2, 3, 4]);
    }

    #[test]
    fn test_category_with_empty_query_filters_case_insensitively() {
        let query = CatalogQuery::new(CategoryFilter::Only(Category::Electronics), "");
        assert_eq!(query.source(), CatalogSource::AllProducts);
        let resolved = query.resolve(catalog());
        assert_eq!(ids(&resolved), [1, 3]);
        assert!(
            resolved
                .iter()
                .all(|p| p.category.eq_ignore_ascii_case("electronics"))
        );
    }

    #[test]
    fn test_search_without_category_keeps_candidates() {
        let query = CatalogQuery::new(CategoryFilter::All, "lamp");
        assert_eq!(query.source(), CatalogSource::Search("lamp"));
        let candidates = vec![product(4, "furniture"), product(1, "electronics")];
        assert_eq!(ids(&query.resolve(candidates)), [4, 1]);
    }

    #[test]
    fn test_search_with_category_intersects() {
        let query = CatalogQuery::new(CategoryFilter::Only(Category::Furniture), "lamp");
        let candidates = vec![product(1, "electronics"), product(4, "furniture")];
        assert_eq!(ids(&query.resolve(candidates)), [4]);
    }

    #[test]
    fn test_whitespace_query_still_searches() {
        let query = CatalogQuery::new(CategoryFilter::All, "   ");
        assert_eq!(query.source(), CatalogSource::Search("   "));
        assert_eq!(
            CatalogQuery::new(CategoryFilter::All, "").source(),
            CatalogSource::AllProducts
        );
    }

    #[test]
    fn test_reload_factors_track_inputs() {
        let a = CatalogQuery::new(CategoryFilter::All, "lamp");
        let b = CatalogQuery::new(CategoryFilter::Only(Category::Clothes), "lamp");
        let c = CatalogQuery::new(CategoryFilter::All, "lamp");
        let d = CatalogQuery::new(CategoryFilter::All, "lamp ");
        assert_ne!(a.reload_factors(), b.reload_factors());
        assert_eq!(a.reload_factors(), c.reload_factors());
        assert_ne!(a.reload_factors(), d.reload_factors());
    }
}
