//! Pagination for list pages.
//!
//! Lists show at most [`MAX_PAGE_SIZE`] items per page. A page is the slice
//! `items[(page - 1) * size .. page * size]`, so walking pages `1..=count`
//! visits every item exactly once, in order.
//!
//! Changing any reload factor (the inputs that produced the list, such as
//! the search text) sends the visitor back to page 1. Page links carry a
//! [`ReloadFactors`] token so a request whose inputs no longer match the
//! link it came from is reset.

use core::ops::RangeInclusive;

use sha2::{Digest, Sha256};

/// Maximum number of items on one page.
pub const MAX_PAGE_SIZE: usize = 10;

/// Page size for a list: ten, or the whole list when it is shorter.
#[must_use]
pub fn page_size_for(len: usize) -> usize {
    len.min(MAX_PAGE_SIZE)
}

/// Number of pages needed for `len` items; zero for an empty list.
#[must_use]
pub const fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        len.div_ceil(page_size)
    }
}

/// Fingerprint of the inputs that produced a list.
///
/// The first eight bytes of a SHA-256 over the length-prefixed values, so a
/// token rendered into a page stays valid across restarts and builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReloadFactors(u64);

impl ReloadFactors {
    /// Fingerprint a set of input values.
    #[must_use]
    pub fn from_values(values: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for value in values {
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        let digest = hasher.finalize();
        Self(
            digest
                .as_slice()
                .first_chunk::<8>()
                .map_or(0, |bytes| u64::from_be_bytes(*bytes)),
        )
    }

    /// Token form, for embedding in page links.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{:016x}", self.0)
    }

    /// Whether a token taken from a page link matches these factors.
    #[must_use]
    pub fn matches_token(&self, token: &str) -> bool {
        u64::from_str_radix(token.trim(), 16).is_ok_and(|value| value == self.0)
    }
}

/// Page state for a list of a known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_items: usize,
    page_size: usize,
    page_count: usize,
    current_page: usize,
}

impl Pagination {
    /// Paginate `total_items` items, showing `requested_page` (1-based).
    ///
    /// A missing or zero page means page 1; pages past the end clamp to
    /// the last page.
    #[must_use]
    pub fn new(total_items: usize, requested_page: Option<usize>) -> Self {
        let page_size = page_size_for(total_items);
        let page_count = page_count(total_items, page_size);
        let current_page = requested_page.unwrap_or(1).clamp(1, page_count.max(1));

        Self {
            total_items,
            page_size,
            page_count,
            current_page,
        }
    }

    /// Paginate for a request that came from a page link.
    ///
    /// When the link's reload-factor token does not match the current
    /// inputs, the requested page is ignored and page 1 is shown.
    #[must_use]
    pub fn for_request(
        total_items: usize,
        requested_page: Option<usize>,
        factors: &ReloadFactors,
        token: Option<&str>,
    ) -> Self {
        let pagination = Self::new(total_items, requested_page);
        match token {
            Some(token) if !factors.matches_token(token) => pagination.reset(),
            _ => pagination,
        }
    }

    /// Back to page 1.
    #[must_use]
    pub const fn reset(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }

    /// Items on a full page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// The page being shown (1-based).
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Page numbers to render as controls; empty for an empty list.
    #[must_use]
    pub const fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.page_count
    }

    /// The items on the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.page_slice(items, self.current_page)
    }

    /// The items on an arbitrary page.
    #[must_use]
    pub fn page_slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        if page == 0 || self.page_size == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }
}
