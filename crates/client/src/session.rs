//! Async drivers connecting the core state machines to a [`RemoteCollection`].
//!
//! The controller never awaits anything. A driver takes the ticket a
//! transition issued, performs the request, and feeds the outcome back with
//! [`apply`]. Requests may overlap; whichever order their responses arrive
//! in, the controller's sequence rule decides what is shown.

use catalog_core::bulk_import::{BulkImportPipeline, ImportCompletion, SubmitAttempt};
use catalog_core::controller::{Acceptance, QueryController, QueryTicket, Sequence};
use catalog_core::error::{CoreError, RemoteFailure};
use catalog_core::paging::PageResult;
use catalog_core::types::{active_categories, Category, DbId, Product};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::collection::RemoteCollection;

/// The answer to one product-list request, tagged with its sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub seq: Sequence,
    pub outcome: Result<PageResult<Product>, RemoteFailure>,
}

/// Perform the request described by `ticket`.
///
/// Does not touch the controller, so several of these may be in flight at
/// once.
pub async fn execute<C: RemoteCollection>(client: &C, ticket: QueryTicket) -> QueryResponse {
    tracing::debug!(
        seq = ticket.seq,
        page = ticket.query.page.page(),
        page_size = ticket.query.page.page_size(),
        "Fetching products"
    );
    let outcome = client.fetch_page(&ticket.query).await;
    QueryResponse {
        seq: ticket.seq,
        outcome,
    }
}

/// Hand a response to the controller.
pub fn apply(controller: &mut QueryController, response: QueryResponse) -> Acceptance {
    let seq = response.seq;
    let total = response.outcome.as_ref().ok().map(|page| page.total);
    let acceptance = controller.complete(seq, response.outcome);

    match acceptance {
        Acceptance::Accepted => match total {
            Some(total) => tracing::info!(seq, total, "Product page loaded"),
            None => tracing::warn!(seq, "Product query failed"),
        },
        Acceptance::Stale { highest_accepted } => {
            tracing::debug!(seq, highest_accepted, "Discarding stale product response");
        }
        Acceptance::Unknown => {
            tracing::debug!(seq, "Ignoring response to an unissued request");
        }
    }
    acceptance
}

/// Perform one request and apply its response.
pub async fn run<C: RemoteCollection>(
    controller: &mut QueryController,
    client: &C,
    ticket: QueryTicket,
) -> Acceptance {
    let response = execute(client, ticket).await;
    apply(controller, response)
}

/// Perform several requests concurrently, applying each response as soon as
/// it arrives.
///
/// Returns `(seq, acceptance)` pairs in arrival order.
pub async fn run_overlapping<C: RemoteCollection>(
    controller: &mut QueryController,
    client: &C,
    tickets: Vec<QueryTicket>,
) -> Vec<(Sequence, Acceptance)> {
    let mut in_flight: FuturesUnordered<_> = tickets
        .into_iter()
        .map(|ticket| execute(client, ticket))
        .collect();

    let mut applied = Vec::new();
    while let Some(response) = in_flight.next().await {
        let seq = response.seq;
        applied.push((seq, apply(controller, response)));
    }
    applied
}

/// What [`submit_import`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRun {
    /// The submission ran to completion, successfully or not.
    Finished(ImportCompletion),
    /// A submission was already in flight.
    Busy,
    NoFileSelected,
}

/// Submit the pipeline's selected file and reconcile the answer.
///
/// Fails only if the pipeline refuses the answer to its own submission.
pub async fn submit_import<C: RemoteCollection>(
    pipeline: &mut BulkImportPipeline,
    client: &C,
) -> Result<ImportRun, CoreError> {
    let file = match pipeline.begin_submit() {
        SubmitAttempt::Started(file) => file,
        SubmitAttempt::Busy => return Ok(ImportRun::Busy),
        SubmitAttempt::NoFileSelected => return Ok(ImportRun::NoFileSelected),
    };

    tracing::info!(
        file_name = %file.file_name,
        size_bytes = file.size_bytes(),
        "Submitting bulk import"
    );
    let result = client.submit_bulk(&file).await;
    let Some(completion) = pipeline.complete(result) else {
        return Err(CoreError::Internal(
            "bulk import answer arrived with no submission in flight".to_string(),
        ));
    };

    if let ImportCompletion::Reconciled(outcome) = completion {
        tracing::info!(
            inserted = outcome.inserted,
            failed = outcome.failures.len(),
            "Bulk import reconciled"
        );
    }
    Ok(ImportRun::Finished(completion.clone()))
}

/// Fetch the categories an operator may filter by (active ones only).
pub async fn load_categories<C: RemoteCollection>(client: &C) -> Result<Vec<Category>, RemoteFailure> {
    let categories = client.list_categories().await?;
    Ok(active_categories(categories))
}

/// Delete a product, then refresh the list so it reflects the deletion.
///
/// On failure nothing is refreshed.
pub async fn delete_and_refresh<C: RemoteCollection>(
    controller: &mut QueryController,
    client: &C,
    id: DbId,
) -> Result<Acceptance, RemoteFailure> {
    client.delete_product(id).await?;
    tracing::info!(product_id = id, "Product deleted");
    let ticket = controller.refresh();
    Ok(run(controller, client, ticket).await)
}
