//! Product list query controller.
//!
//! [`QueryController`] owns the (filter, sort, page) triple behind the
//! product table. Every intent change is a named transition that returns a
//! [`QueryTicket`]: the caller performs the request described by the ticket
//! and hands the outcome back through [`QueryController::complete`].
//!
//! Responses may arrive in any order. Each ticket carries a sequence number
//! and a response is only accepted if its sequence is strictly greater than
//! the highest sequence accepted so far; anything else is discarded without
//! touching state. Obsolete requests are never cancelled, their results are
//! simply ignored.
//!
//! The page displayed to the operator is written only by the accept rule.
//! After a failure the last successfully loaded page stays visible.

use crate::error::{CoreError, RemoteFailure};
use crate::filter::{self, FilterCriteria, NormalizedCriteria};
use crate::paging::{PageRequest, PageResult};
use crate::query::{ProductQuery, SortSpec};
use crate::types::Product;

/// Monotonic request counter. The first issued request has sequence 1.
pub type Sequence = u64;

/// Loading state of the product list.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// Nothing requested yet.
    Idle,
    /// At least one request is in flight and no newer result is accepted.
    Fetching,
    /// The most recently accepted response was a page.
    Loaded(PageResult<Product>),
    /// The most recently accepted response was a failure.
    Failed(RemoteFailure),
}

/// A request the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: Sequence,
    pub query: ProductQuery,
}

/// What [`QueryController::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// The response became the current state.
    Accepted,
    /// A response with an equal or newer sequence was already accepted.
    Stale { highest_accepted: Sequence },
    /// The sequence was never issued by this controller.
    Unknown,
}

/// Owner of the product list's filter, sort and pagination state.
#[derive(Debug)]
pub struct QueryController {
    criteria: FilterCriteria,
    normalized: NormalizedCriteria,
    sort: Option<SortSpec>,
    page: PageRequest,
    state: QueryState,
    /// Last good page, kept while the state is `Fetching` or `Failed`.
    retained: Option<PageResult<Product>>,
    last_issued: Sequence,
    highest_accepted: Option<Sequence>,
}

impl QueryController {
    /// Create a controller showing page 1 at `page_size`, with no filters
    /// and the server's default order.
    pub fn new(page_size: u32) -> Result<Self, CoreError> {
        Ok(Self {
            criteria: FilterCriteria::default(),
            normalized: NormalizedCriteria::default(),
            sort: None,
            page: PageRequest::first(page_size)?,
            state: QueryState::Idle,
            retained: None,
            last_issued: 0,
            highest_accepted: None,
        })
    }

    // ---- transitions ----

    /// Replace the filter criteria and go back to page 1.
    ///
    /// Invalid criteria (e.g. an inverted price range) are rejected before
    /// anything changes and no ticket is issued.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<QueryTicket, CoreError> {
        let normalized = filter::validate(&criteria)?;
        self.criteria = criteria;
        self.normalized = normalized;
        self.page = self.page.reset();
        Ok(self.issue())
    }

    /// Drop every filter and go back to page 1.
    pub fn clear_filters(&mut self) -> QueryTicket {
        self.criteria = FilterCriteria::default();
        self.normalized = NormalizedCriteria::default();
        self.page = self.page.reset();
        self.issue()
    }

    /// Change the sort order (`None` for server default) and go back to page 1.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> QueryTicket {
        self.sort = sort;
        self.page = self.page.reset();
        self.issue()
    }

    /// Move to another page, keeping filters, sort and page size.
    pub fn set_page(&mut self, page: u32) -> Result<QueryTicket, CoreError> {
        self.set_pagination(page, self.page.page_size())
    }

    /// Change the page size, keeping filters, sort and the current page.
    ///
    /// The current page is not clamped even if it ends up past the last page.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<QueryTicket, CoreError> {
        self.set_pagination(self.page.page(), page_size)
    }

    /// Change page and page size together, keeping filters and sort.
    pub fn set_pagination(&mut self, page: u32, page_size: u32) -> Result<QueryTicket, CoreError> {
        self.page = PageRequest::new(page, page_size)?;
        Ok(self.issue())
    }

    /// Replace criteria, sort and pagination together with a single request.
    ///
    /// Validates the criteria first; on error nothing changes.
    pub fn set_query(
        &mut self,
        criteria: FilterCriteria,
        sort: Option<SortSpec>,
        page: PageRequest,
    ) -> Result<QueryTicket, CoreError> {
        let normalized = filter::validate(&criteria)?;
        self.criteria = criteria;
        self.normalized = normalized;
        self.sort = sort;
        self.page = page;
        Ok(self.issue())
    }

    /// Re-issue the current query unchanged, e.g. after a record was
    /// created, updated or deleted elsewhere.
    pub fn refresh(&mut self) -> QueryTicket {
        self.issue()
    }

    /// Reconcile the outcome of the request tagged `seq`.
    pub fn complete(
        &mut self,
        seq: Sequence,
        outcome: Result<PageResult<Product>, RemoteFailure>,
    ) -> Acceptance {
        if seq == 0 || seq > self.last_issued {
            return Acceptance::Unknown;
        }
        if let Some(highest) = self.highest_accepted {
            if seq <= highest {
                return Acceptance::Stale {
                    highest_accepted: highest,
                };
            }
        }

        self.highest_accepted = Some(seq);
        match outcome {
            Ok(page) => {
                self.retained = None;
                self.state = QueryState::Loaded(page);
            }
            Err(failure) => self.transition(QueryState::Failed(failure)),
        }
        Acceptance::Accepted
    }

    // ---- accessors ----

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// The filter criteria as last entered (not normalized).
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// The query a refresh would issue right now.
    pub fn current_query(&self) -> ProductQuery {
        ProductQuery {
            criteria: self.normalized.clone(),
            sort: self.sort,
            page: self.page,
        }
    }

    /// The page to show: the current one when loaded, otherwise the last
    /// successfully loaded page, if any.
    pub fn displayed(&self) -> Option<&PageResult<Product>> {
        match &self.state {
            QueryState::Loaded(page) => Some(page),
            _ => self.retained.as_ref(),
        }
    }

    pub fn last_issued(&self) -> Sequence {
        self.last_issued
    }

    pub fn highest_accepted(&self) -> Option<Sequence> {
        self.highest_accepted
    }

    /// `true` while the newest issued request has not been answered.
    pub fn is_pending(&self) -> bool {
        self.highest_accepted.unwrap_or(0) < self.last_issued
    }

    // ---- private helpers ----

    fn issue(&mut self) -> QueryTicket {
        self.last_issued += 1;
        self.transition(QueryState::Fetching);
        QueryTicket {
            seq: self.last_issued,
            query: self.current_query(),
        }
    }

    /// Move to `next`, keeping a loaded page around as the retained one.
    fn transition(&mut self, next: QueryState) {
        if let QueryState::Loaded(page) = std::mem::replace(&mut self.state, next) {
            self.retained = Some(page);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
