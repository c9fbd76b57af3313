//! REST API client for the catalog collection service.
//!
//! Wraps the product, category and bulk-import endpoints using [`reqwest`].
//! Successful payloads arrive wrapped in a `{ data }` envelope which is
//! stripped here; failures are turned into [`ApiError::Server`] carrying the
//! body's `message`.

use std::time::Duration;

use catalog_core::bulk_import::{BulkUploadResponse, CandidateFile, UPLOAD_FIELD_NAME};
use catalog_core::paging::PageResult;
use catalog_core::query::ProductQuery;
use catalog_core::types::{Category, CategoryInput, DbId, Product, ProductInput};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, GENERIC_FAILURE_MESSAGE};

/// HTTP client for one catalog service.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    client: reqwest::Client,
    api_url: String,
}

/// Success envelope wrapping every non-bulk payload.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Failure body; only `message` is read.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl CatalogApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:3000/api`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Build a client with the configured base URL and request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- products ----

    /// Fetch one page of products.
    ///
    /// Sends `GET /products` with the query's filter, sort and pagination
    /// parameters. Absent filters are not sent.
    pub async fn fetch_products(
        &self,
        query: &ProductQuery,
    ) -> Result<PageResult<Product>, ApiError> {
        let response = self
            .client
            .get(self.url("products"))
            .query(&query.to_params())
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn get_product(&self, id: DbId) -> Result<Product, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("products/{id}")))
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let response = self
            .client
            .post(self.url("products"))
            .json(input)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn update_product(&self, id: DbId, input: &ProductInput) -> Result<Product, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("products/{id}")))
            .json(input)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn delete_product(&self, id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("products/{id}")))
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- categories ----

    /// Fetch every category, active or not.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self.client.get(self.url("categories")).send().await?;

        Self::parse_data(response).await
    }

    pub async fn get_category(&self, id: DbId) -> Result<Category, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("categories/{id}")))
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let response = self
            .client
            .post(self.url("categories"))
            .json(input)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn update_category(
        &self,
        id: DbId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("categories/{id}")))
            .json(input)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    pub async fn delete_category(&self, id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("categories/{id}")))
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- bulk import ----

    /// Upload a spreadsheet for bulk insertion.
    ///
    /// Sends `POST /products/masivo` as multipart with the file in the
    /// `file` field. The answer is not enveloped: it is read directly as a
    /// [`BulkUploadResponse`].
    pub async fn upload_bulk(&self, file: &CandidateFile) -> Result<BulkUploadResponse, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.effective_mime_type())?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .client
            .post(self.url("products/masivo"))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Server`] carrying
    /// the body's `message` on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: failure_message(&body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    ///
    /// A body that is not the expected JSON becomes [`ApiError::Decode`]
    /// carrying the response status.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|source| {
            if source.is_decode() {
                ApiError::Decode { status, source }
            } else {
                ApiError::Request(source)
            }
        })
    }

    /// Parse a successful `{ data }` response and unwrap the payload.
    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let envelope: DataEnvelope<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// The `message` of a failure body, or [`GENERIC_FAILURE_MESSAGE`] when the
/// body is empty, not JSON, or has no usable message.
fn failure_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
