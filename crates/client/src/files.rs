//! Loading spreadsheets from disk for import or local checks.

use std::path::Path;

use catalog_core::bulk_import::{
    check_file, check_file_metadata, BulkImportOutcome, BulkImportPipeline, CandidateFile,
    ImportCompletion, Selection,
};

use crate::cli::CliError;
use crate::collection::RemoteCollection;
use crate::session::{self, ImportRun};

/// Read `path` as an upload candidate.
///
/// The type and size checks run on the file's metadata first, so a file
/// that is too large is refused without loading its contents.
pub async fn load_candidate(path: &Path) -> Result<CandidateFile, CliError> {
    let io_error = |source: std::io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
    check_file_metadata(&file_name, None, metadata.len())?;

    let bytes = tokio::fs::read(path).await.map_err(io_error)?;
    let file = CandidateFile::new(file_name, None, bytes);
    // The file may have grown since the metadata was read.
    check_file(&file)?;

    tracing::debug!(file_name = %file.file_name, size_bytes = file.size_bytes(), "Loaded import file");
    Ok(file)
}

/// Load `path` and submit it as a bulk import.
///
/// Anything short of a reconciled answer is an error: a rejected file, a
/// failed submission, or a submission that never started.
pub async fn import_file<C: RemoteCollection>(
    client: &C,
    path: &Path,
) -> Result<BulkImportOutcome, CliError> {
    let file = load_candidate(path).await?;
    let mut pipeline = BulkImportPipeline::new();

    match pipeline.select(file) {
        Selection::Selected => {}
        Selection::Rejected(rejection) => return Err(rejection.into()),
        Selection::Busy => return Err(CliError::NotSubmitted("another import is in flight")),
    }

    match session::submit_import(&mut pipeline, client).await? {
        ImportRun::Finished(ImportCompletion::Reconciled(outcome)) => Ok(outcome),
        ImportRun::Finished(ImportCompletion::Failed { failure, .. }) => Err(failure.into()),
        ImportRun::Busy => Err(CliError::NotSubmitted("another import is in flight")),
        ImportRun::NoFileSelected => Err(CliError::NotSubmitted("no file selected")),
    }
}
