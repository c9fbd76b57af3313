//! Sort specification and the encoded product query.
//!
//! [`ProductQuery`] is the full (filter, sort, page) triple for one request;
//! [`ProductQuery::to_params`] encodes it as the `GET /products` query string
//! pairs. Absent filters are omitted entirely.

use crate::filter::NormalizedCriteria;
use crate::paging::PageRequest;

// ---------------------------------------------------------------------------
// Query parameter names
// ---------------------------------------------------------------------------

pub const PARAM_SEARCH: &str = "search";
pub const PARAM_CATEGORY: &str = "idCategoria";
pub const PARAM_PRICE_MIN: &str = "precioMin";
pub const PARAM_PRICE_MAX: &str = "precioMax";
pub const PARAM_ACTIVE: &str = "activo";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PAGE_SIZE: &str = "pageSize";
pub const PARAM_SORT_BY: &str = "sortBy";
pub const PARAM_SORT_DIR: &str = "sortDir";

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns of the product table the server can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
}

impl SortField {
    /// Wire name, matching the product field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Price => "Price",
        }
    }

    /// Parse a column name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Server-side ordering. `None` where a `SortSpec` is optional means the
/// server's default order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

// ---------------------------------------------------------------------------
// Encoded query
// ---------------------------------------------------------------------------

/// Everything needed to request one page of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub criteria: NormalizedCriteria,
    pub sort: Option<SortSpec>,
    pub page: PageRequest,
}

impl ProductQuery {
    /// Encode as query-string pairs in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let criteria = &self.criteria;

        if let Some(search) = &criteria.search {
            params.push((PARAM_SEARCH, search.clone()));
        }
        if let Some(category_id) = criteria.category_id {
            params.push((PARAM_CATEGORY, category_id.to_string()));
        }
        if let Some(min) = criteria.price_min {
            params.push((PARAM_PRICE_MIN, min.to_string()));
        }
        if let Some(max) = criteria.price_max {
            params.push((PARAM_PRICE_MAX, max.to_string()));
        }
        if let Some(active) = criteria.active {
            params.push((PARAM_ACTIVE, active.to_string()));
        }

        params.push((PARAM_PAGE, self.page.page().to_string()));
        params.push((PARAM_PAGE_SIZE, self.page.page_size().to_string()));

        if let Some(sort) = self.sort {
            params.push((PARAM_SORT_BY, sort.field.as_str().to_string()));
            params.push((PARAM_SORT_DIR, sort.direction.as_str().to_string()));
        }

        params
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
