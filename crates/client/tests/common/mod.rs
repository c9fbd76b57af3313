//! In-memory [`RemoteCollection`] used by the integration tests.
//!
//! Responses are delayed with `tokio::time::sleep`, so tests running under
//! paused time can make later requests finish first.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use catalog_client::collection::RemoteCollection;
use catalog_core::bulk_import::{BulkUploadResponse, CandidateFile};
use catalog_core::error::RemoteFailure;
use catalog_core::paging::PageResult;
use catalog_core::query::ProductQuery;
use catalog_core::types::{Category, CategoryRef, DbId, Product};
use rust_decimal::Decimal;

pub fn product(id: DbId, name: &str, price_cents: i64) -> Product {
    Product {
        product_id: id,
        name: name.to_string(),
        description: None,
        sku: Some(format!("SKU-{id:03}")),
        price: Decimal::new(price_cents, 2),
        stock: 10,
        category_id: 1,
        is_active: true,
        category: Some(CategoryRef {
            category_id: Some(1),
            name: "Tech".to_string(),
        }),
    }
}

pub fn category(id: DbId, name: &str, is_active: bool) -> Category {
    Category {
        category_id: id,
        name: name.to_string(),
        description: None,
        is_active,
    }
}

#[derive(Default)]
pub struct FakeCollection {
    products: Vec<Product>,
    categories: Vec<Category>,
    /// Response delay per search term; the empty string is "no search".
    delays: HashMap<String, Duration>,
    fetch_failure: Mutex<Option<RemoteFailure>>,
    bulk_results: Mutex<Vec<Result<BulkUploadResponse, RemoteFailure>>>,
    delete_failure: Option<RemoteFailure>,
    queries: Mutex<Vec<ProductQuery>>,
    submitted: Mutex<Vec<String>>,
    deleted: Mutex<Vec<DbId>>,
    fetches: AtomicUsize,
}

impl FakeCollection {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_delay(mut self, search: &str, delay: Duration) -> Self {
        self.delays.insert(search.to_string(), delay);
        self
    }

    pub fn with_delete_failure(mut self, failure: RemoteFailure) -> Self {
        self.delete_failure = Some(failure);
        self
    }

    /// Queue the answers to the next bulk submissions, in order.
    pub fn with_bulk_results(self, results: Vec<Result<BulkUploadResponse, RemoteFailure>>) -> Self {
        *self.bulk_results.lock().unwrap() = results;
        self
    }

    /// Make every subsequent fetch fail (or succeed again with `None`).
    pub fn fail_fetches(&self, failure: Option<RemoteFailure>) {
        *self.fetch_failure.lock().unwrap() = failure;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<ProductQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<DbId> {
        self.deleted.lock().unwrap().clone()
    }

    fn matching(&self, query: &ProductQuery) -> Vec<Product> {
        let search = query
            .criteria
            .search
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&search))
            .cloned()
            .collect()
    }
}

impl RemoteCollection for FakeCollection {
    async fn fetch_page(&self, query: &ProductQuery) -> Result<PageResult<Product>, RemoteFailure> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        let failure = self.fetch_failure.lock().unwrap().clone();

        let search = query.criteria.search.clone().unwrap_or_default();
        if let Some(delay) = self.delays.get(&search) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(failure) = failure {
            return Err(failure);
        }

        let matching = self.matching(query);
        let size = query.page.page_size() as usize;
        let skip = (query.page.page() as usize - 1) * size;
        Ok(PageResult {
            total: matching.len() as u64,
            items: matching.into_iter().skip(skip).take(size).collect(),
        })
    }

    async fn submit_bulk(&self, file: &CandidateFile) -> Result<BulkUploadResponse, RemoteFailure> {
        self.submitted.lock().unwrap().push(file.file_name.clone());
        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut results = self.bulk_results.lock().unwrap();
        if results.is_empty() {
            return Ok(BulkUploadResponse::default());
        }
        results.remove(0)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RemoteFailure> {
        Ok(self.categories.clone())
    }

    async fn delete_product(&self, id: DbId) -> Result<(), RemoteFailure> {
        if let Some(failure) = &self.delete_failure {
            return Err(failure.clone());
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}
