//! The remote collection interface the async drivers talk to.
//!
//! [`RemoteCollection`] is the seam between the state machines and the
//! network. [`CatalogApi`] implements it over HTTP; tests substitute an
//! in-memory fake.

use std::future::Future;

use catalog_core::bulk_import::{BulkUploadResponse, CandidateFile};
use catalog_core::error::RemoteFailure;
use catalog_core::paging::PageResult;
use catalog_core::query::ProductQuery;
use catalog_core::types::{Category, DbId, Product};

use crate::api::CatalogApi;
use crate::error::ApiError;

/// Remote operations needed to browse and bulk-load the catalog.
///
/// Every failure is reported as a transport-agnostic [`RemoteFailure`].
pub trait RemoteCollection: Send + Sync {
    /// Fetch one page of products matching `query`.
    fn fetch_page(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<PageResult<Product>, RemoteFailure>> + Send;

    /// Submit a spreadsheet for bulk insertion.
    fn submit_bulk(
        &self,
        file: &CandidateFile,
    ) -> impl Future<Output = Result<BulkUploadResponse, RemoteFailure>> + Send;

    /// Fetch every category.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, RemoteFailure>> + Send;

    /// Delete one product.
    fn delete_product(&self, id: DbId) -> impl Future<Output = Result<(), RemoteFailure>> + Send;
}

impl RemoteCollection for CatalogApi {
    async fn fetch_page(&self, query: &ProductQuery) -> Result<PageResult<Product>, RemoteFailure> {
        self.fetch_products(query)
            .await
            .map_err(|e| report("fetch_products", e))
    }

    async fn submit_bulk(&self, file: &CandidateFile) -> Result<BulkUploadResponse, RemoteFailure> {
        self.upload_bulk(file)
            .await
            .map_err(|e| report("upload_bulk", e))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RemoteFailure> {
        CatalogApi::list_categories(self)
            .await
            .map_err(|e| report("list_categories", e))
    }

    async fn delete_product(&self, id: DbId) -> Result<(), RemoteFailure> {
        CatalogApi::delete_product(self, id)
            .await
            .map_err(|e| report("delete_product", e))
    }
}

fn report(operation: &'static str, err: ApiError) -> RemoteFailure {
    let failure = err.to_failure();
    tracing::warn!(
        operation,
        status = ?failure.status,
        kind = ?failure.kind,
        error = %err,
        "Catalog request failed"
    );
    failure
}
