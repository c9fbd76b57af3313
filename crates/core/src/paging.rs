//! Pagination constants, requests and result pages.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Page size defaults
// ---------------------------------------------------------------------------

/// Page sizes the product table offers.
pub const ALLOWED_PAGE_SIZES: &[u32] = &[10, 20, 50, 100];

/// Page size used until the operator picks another one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Check whether a page size is one of [`ALLOWED_PAGE_SIZES`].
pub fn is_allowed_page_size(size: u32) -> bool {
    ALLOWED_PAGE_SIZES.contains(&size)
}

/// Validate a page size against [`ALLOWED_PAGE_SIZES`].
pub fn validate_page_size(size: u32) -> Result<(), CoreError> {
    if is_allowed_page_size(size) {
        Ok(())
    } else {
        let allowed: Vec<String> = ALLOWED_PAGE_SIZES.iter().map(u32::to_string).collect();
        Err(CoreError::Validation(format!(
            "Invalid page size {size}. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which page to fetch and how large it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a page request, rejecting page 0 and unlisted page sizes.
    pub fn new(page: u32, page_size: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }
        validate_page_size(page_size)?;
        Ok(Self { page, page_size })
    }

    /// First page at the given (already validated) size.
    pub fn first(page_size: u32) -> Result<Self, CoreError> {
        Self::new(1, page_size)
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Same page size, back to page 1.
    pub fn reset(self) -> Self {
        Self { page: 1, ..self }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a server-paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Number of items matching the query across all pages.
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Number of pages needed to show `total` items at `page_size` per page.
///
/// An empty collection still has one (empty) page.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(u64::from(page_size)).max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
