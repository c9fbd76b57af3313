//! Bulk product import: file checks, submission state and outcome
//! reconciliation.
//!
//! The pipeline never looks inside the spreadsheet. Row-level validation
//! (required fields, category existence, positive prices) happens on the
//! server; the pipeline only turns the server's answer into a
//! [`BulkImportOutcome`] that reports inserted rows and itemized failures
//! side by side.
//!
//! State flow:
//!
//! ```text
//! NoFile -> FileSelected -> Submitting -> Completed -> NoFile
//!    \            \
//!     `-> Rejected `-> Rejected        (client-side file checks)
//! ```

use serde::Deserialize;

use crate::error::RemoteFailure;
use crate::import_schema::{RowFailure, RowIssueCode};

// ── Constants ────────────────────────────────────────────────────────

/// Uploads must be strictly smaller than this (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// File extensions accepted for bulk import.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_CSV: &str = "text/csv";

/// MIME types accepted for bulk import.
pub const ALLOWED_MIME_TYPES: &[&str] = &[MIME_XLSX, MIME_XLS, MIME_CSV];

/// Multipart field name the bulk endpoint reads the file from.
pub const UPLOAD_FIELD_NAME: &str = "file";

// ── Candidate files ──────────────────────────────────────────────────

/// A file the operator picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub file_name: String,
    /// MIME type reported by the picker, if any.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercase extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.file_name)
    }

    /// MIME type to send: the reported one, or one derived from the extension.
    pub fn effective_mime_type(&self) -> &str {
        if let Some(mime) = self.mime_type.as_deref().filter(|m| !m.is_empty()) {
            return mime;
        }
        match self.extension().as_deref() {
            Some("xlsx") => MIME_XLSX,
            Some("xls") => MIME_XLS,
            Some("csv") => MIME_CSV,
            _ => "application/octet-stream",
        }
    }
}

/// Why a file was refused at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    /// Extension or MIME type outside the allow-list.
    UnsupportedType { file_name: String },
    /// File is 5 MiB or larger.
    TooLarge { size_bytes: u64 },
}

impl FileRejection {
    /// Stable machine-readable reason.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported_file_type",
            Self::TooLarge { .. } => "file_too_large",
        }
    }
}

impl std::fmt::Display for FileRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType { file_name } => write!(
                f,
                "Only Excel (.xlsx, .xls) or CSV files are allowed, got '{file_name}'"
            ),
            Self::TooLarge { size_bytes } => write!(
                f,
                "File must be smaller than 5 MB, got {size_bytes} bytes"
            ),
        }
    }
}

impl std::error::Error for FileRejection {}

/// Lowercase extension of `file_name` without the dot, if it has one.
fn file_extension(file_name: &str) -> Option<String> {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < file_name.len() => {
            Some(file_name[pos + 1..].to_lowercase())
        }
        _ => None,
    }
}

/// Check a candidate file against the type allow-list and the size limit.
///
/// The extension must be allowed; a reported MIME type, when present,
/// must be allowed as well.
pub fn check_file(file: &CandidateFile) -> Result<(), FileRejection> {
    check_file_metadata(&file.file_name, file.mime_type.as_deref(), file.size_bytes())
}

/// Same checks as [`check_file`], from the name, reported MIME type and size
/// alone. Lets a caller refuse a file before loading its contents.
pub fn check_file_metadata(
    file_name: &str,
    mime_type: Option<&str>,
    size_bytes: u64,
) -> Result<(), FileRejection> {
    let extension_ok = file_extension(file_name)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    let mime_ok = match mime_type {
        None | Some("") => true,
        Some(mime) => ALLOWED_MIME_TYPES.contains(&mime),
    };
    if !extension_ok || !mime_ok {
        return Err(FileRejection::UnsupportedType {
            file_name: file_name.to_string(),
        });
    }

    if size_bytes >= MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge { size_bytes });
    }

    Ok(())
}

// ── Server response and outcome ──────────────────────────────────────

/// Body of `POST /products/masivo`.
///
/// Absent fields default to: `message` empty, `inserted` 0, `errors` none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BulkUploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub inserted: u64,
    #[serde(default)]
    pub errors: Option<Vec<BulkRowError>>,
}

/// One rejected row as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BulkRowError {
    pub row: u32,
    #[serde(default)]
    pub reason: String,
}

/// Reconciled result of one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkImportOutcome {
    /// Server summary message.
    pub message: String,
    /// Rows seen: always `inserted + failures.len()`.
    pub total: u64,
    pub inserted: u64,
    /// Rejected rows, in the order the server reported them.
    pub failures: Vec<RowFailure>,
}

impl BulkImportOutcome {
    pub fn from_response(response: BulkUploadResponse) -> Self {
        let failures: Vec<RowFailure> = response
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| RowFailure {
                row_index: e.row,
                reason_code: RowIssueCode::ServerRejected,
                message: e.reason,
            })
            .collect();

        Self {
            message: response.message,
            total: response.inserted + failures.len() as u64,
            inserted: response.inserted,
            failures,
        }
    }

    /// Every row was inserted.
    pub fn is_full_success(&self) -> bool {
        self.failures.is_empty() && self.inserted == self.total
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportCompletion {
    /// The server answered; rows may be partially inserted.
    Reconciled(BulkImportOutcome),
    /// The whole submission failed; nothing is assumed inserted. The file
    /// is kept so the operator can submit it again.
    Failed {
        failure: RemoteFailure,
        file: CandidateFile,
    },
}

impl ImportCompletion {
    /// Rows reported inserted; zero for a failed submission.
    pub fn inserted(&self) -> u64 {
        match self {
            Self::Reconciled(outcome) => outcome.inserted,
            Self::Failed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportState {
    NoFile,
    FileSelected(CandidateFile),
    Submitting(CandidateFile),
    Completed(ImportCompletion),
    /// Last selection failed the client-side checks. Another file may be
    /// selected.
    Rejected(FileRejection),
}

impl ImportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoFile => "no_file",
            Self::FileSelected(_) => "file_selected",
            Self::Submitting(_) => "submitting",
            Self::Completed(_) => "completed",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Result of [`BulkImportPipeline::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected,
    Rejected(FileRejection),
    /// A submission is in flight; the selection was ignored.
    Busy,
}

/// Result of [`BulkImportPipeline::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Send this file to the bulk endpoint, then call
    /// [`BulkImportPipeline::complete`].
    Started(CandidateFile),
    /// A submission is already in flight; nothing was queued.
    Busy,
    NoFileSelected,
}

/// State machine for one bulk-import dialog.
#[derive(Debug)]
pub struct BulkImportPipeline {
    state: ImportState,
}

impl Default for BulkImportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkImportPipeline {
    pub fn new() -> Self {
        Self {
            state: ImportState::NoFile,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// `true` while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, ImportState::Submitting(_))
    }

    /// The completion of the last submission, if the pipeline is completed.
    pub fn completion(&self) -> Option<&ImportCompletion> {
        match &self.state {
            ImportState::Completed(completion) => Some(completion),
            _ => None,
        }
    }

    /// Pick a file. Any previous selection or outcome is replaced.
    pub fn select(&mut self, file: CandidateFile) -> Selection {
        if self.is_busy() {
            return Selection::Busy;
        }
        match check_file(&file) {
            Ok(()) => {
                self.state = ImportState::FileSelected(file);
                Selection::Selected
            }
            Err(rejection) => {
                self.state = ImportState::Rejected(rejection.clone());
                Selection::Rejected(rejection)
            }
        }
    }

    /// Drop the current selection or outcome and return to `NoFile`.
    ///
    /// Ignored while a submission is in flight.
    pub fn reset(&mut self) {
        if !self.is_busy() {
            self.state = ImportState::NoFile;
        }
    }

    /// Start submitting the selected file.
    ///
    /// A file left over from a failed submission may be submitted again.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        let file = match std::mem::replace(&mut self.state, ImportState::NoFile) {
            ImportState::FileSelected(file)
            | ImportState::Completed(ImportCompletion::Failed { file, .. }) => file,
            busy @ ImportState::Submitting(_) => {
                self.state = busy;
                return SubmitAttempt::Busy;
            }
            other => {
                self.state = other;
                return SubmitAttempt::NoFileSelected;
            }
        };

        self.state = ImportState::Submitting(file.clone());
        SubmitAttempt::Started(file)
    }

    /// Reconcile the server's answer to the in-flight submission.
    ///
    /// Returns `None` (and changes nothing) when no submission is in flight.
    pub fn complete(
        &mut self,
        result: Result<BulkUploadResponse, RemoteFailure>,
    ) -> Option<&ImportCompletion> {
        let file = match std::mem::replace(&mut self.state, ImportState::NoFile) {
            ImportState::Submitting(file) => file,
            other => {
                self.state = other;
                return None;
            }
        };

        let completion = match result {
            Ok(response) => ImportCompletion::Reconciled(BulkImportOutcome::from_response(response)),
            Err(failure) => ImportCompletion::Failed { failure, file },
        };
        self.state = ImportState::Completed(completion);
        self.completion()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
