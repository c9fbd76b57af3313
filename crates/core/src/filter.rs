//! Product list filters and their normalization.
//!
//! [`FilterCriteria`] is what the operator typed; [`NormalizedCriteria`] is
//! what may be sent to the service. Only [`validate`] converts one into the
//! other, so an invalid range can never reach the network layer.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::DbId;

/// Message surfaced when `price_min > price_max`.
pub const INVALID_PRICE_RANGE: &str = "invalid price range";

/// Message surfaced when a price bound is below zero.
pub const NEGATIVE_PRICE_BOUND: &str = "price filters must be non-negative";

/// Raw filter input as edited by the operator.
///
/// Every structured field is optional; `None` means "no filter", never
/// zero or `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text search over product names. Blank means no filter.
    pub search: String,
    pub category_id: Option<DbId>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    /// `Some(true)` lists active products only, `Some(false)` inactive only.
    pub active: Option<bool>,
}

impl FilterCriteria {
    /// Criteria with only a search term set.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }
}

/// Filter criteria that passed validation, ready to be encoded as query
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCriteria {
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub active: Option<bool>,
}

impl NormalizedCriteria {
    /// `true` when no filter at all would be sent.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Validate and normalize operator filter input.
///
/// - Search text is trimmed; an empty result is treated as absent.
/// - Negative price bounds are rejected.
/// - `price_min > price_max` is rejected with [`INVALID_PRICE_RANGE`].
pub fn validate(criteria: &FilterCriteria) -> Result<NormalizedCriteria, CoreError> {
    let search = Some(criteria.search.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    for bound in [criteria.price_min, criteria.price_max].into_iter().flatten() {
        if bound < Decimal::ZERO {
            return Err(CoreError::Validation(NEGATIVE_PRICE_BOUND.to_string()));
        }
    }

    if let (Some(min), Some(max)) = (criteria.price_min, criteria.price_max) {
        if min > max {
            return Err(CoreError::Validation(INVALID_PRICE_RANGE.to_string()));
        }
    }

    Ok(NormalizedCriteria {
        search,
        category_id: criteria.category_id,
        price_min: criteria.price_min,
        price_max: criteria.price_max,
        active: criteria.active,
    })
}
