//! Column schema for bulk product spreadsheets.
//!
//! Spreadsheet cells arrive as untyped text. This module names the expected
//! columns, coerces each raw row into a typed [`ProductImportRow`] and
//! reports anything it cannot coerce as a [`RowFailure`] with a reason code.
//!
//! The server remains the authority on row validity; the local check exists
//! so an operator can spot obvious mistakes in a CSV before uploading it.

use std::io;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, PRODUCT_DESCRIPTION_MAX_LEN, PRODUCT_NAME_MAX_LEN, PRODUCT_SKU_MAX_LEN};

// ── Columns ──────────────────────────────────────────────────────────

/// Columns of the import schema, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportColumn {
    Name,
    Description,
    Sku,
    Price,
    Stock,
    CategoryId,
}

impl ImportColumn {
    pub const ALL: [ImportColumn; 6] = [
        Self::Name,
        Self::Description,
        Self::Sku,
        Self::Price,
        Self::Stock,
        Self::CategoryId,
    ];

    /// Header text as it appears in the spreadsheet.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Sku => "Sku",
            Self::Price => "Price",
            Self::Stock => "Stock",
            Self::CategoryId => "CategoryId",
        }
    }

    /// Columns every file must contain.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Name | Self::Price | Self::CategoryId)
    }
}

// ── Row types ────────────────────────────────────────────────────────

/// A spreadsheet row before coercion. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkImportRow {
    /// 1-based spreadsheet row; the header is row 1.
    pub row_index: u32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub category_id: Option<String>,
}

impl BulkImportRow {
    fn set(&mut self, column: ImportColumn, value: Option<String>) {
        match column {
            ImportColumn::Name => self.name = value,
            ImportColumn::Description => self.description = value,
            ImportColumn::Sku => self.sku = value,
            ImportColumn::Price => self.price = value,
            ImportColumn::Stock => self.stock = value,
            ImportColumn::CategoryId => self.category_id = value,
        }
    }
}

/// A row that satisfies the schema. Field order matches the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductImportRow {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: DbId,
}

/// Reason a row was not (or would not be) inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIssueCode {
    MissingName,
    NameTooLong,
    DescriptionTooLong,
    SkuTooLong,
    MissingPrice,
    InvalidPrice,
    InvalidStock,
    MissingCategory,
    InvalidCategory,
    /// Rejected by the server; the message carries its reason.
    ServerRejected,
}

impl RowIssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::NameTooLong => "name_too_long",
            Self::DescriptionTooLong => "description_too_long",
            Self::SkuTooLong => "sku_too_long",
            Self::MissingPrice => "missing_price",
            Self::InvalidPrice => "invalid_price",
            Self::InvalidStock => "invalid_stock",
            Self::MissingCategory => "missing_category",
            Self::InvalidCategory => "invalid_category",
            Self::ServerRejected => "server_rejected",
        }
    }
}

impl std::fmt::Display for RowIssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row_index: u32,
    pub reason_code: RowIssueCode,
    pub message: String,
}

/// Result of checking a whole file against the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub valid: Vec<(u32, ProductImportRow)>,
    pub failures: Vec<RowFailure>,
}

impl SchemaReport {
    pub fn total(&self) -> usize {
        self.valid.len() + self.failures.len()
    }
}

// ── Coercion ─────────────────────────────────────────────────────────

/// Coerce a raw row into a typed row, stopping at the first issue.
///
/// Defaults: blank `Description`/`Sku` are absent, blank `Stock` is 0.
pub fn coerce(row: &BulkImportRow) -> Result<ProductImportRow, RowFailure> {
    let fail = |reason_code: RowIssueCode, message: String| RowFailure {
        row_index: row.row_index,
        reason_code,
        message,
    };

    let name = row
        .name
        .clone()
        .ok_or_else(|| fail(RowIssueCode::MissingName, "Name is required".to_string()))?;
    if name.chars().count() > PRODUCT_NAME_MAX_LEN {
        return Err(fail(
            RowIssueCode::NameTooLong,
            format!("Name exceeds {PRODUCT_NAME_MAX_LEN} characters"),
        ));
    }

    if let Some(description) = &row.description {
        if description.chars().count() > PRODUCT_DESCRIPTION_MAX_LEN {
            return Err(fail(
                RowIssueCode::DescriptionTooLong,
                format!("Description exceeds {PRODUCT_DESCRIPTION_MAX_LEN} characters"),
            ));
        }
    }

    if let Some(sku) = &row.sku {
        if sku.chars().count() > PRODUCT_SKU_MAX_LEN {
            return Err(fail(
                RowIssueCode::SkuTooLong,
                format!("Sku exceeds {PRODUCT_SKU_MAX_LEN} characters"),
            ));
        }
    }

    let raw_price = row
        .price
        .as_deref()
        .ok_or_else(|| fail(RowIssueCode::MissingPrice, "Price is required".to_string()))?;
    let price = raw_price
        .parse::<Decimal>()
        .ok()
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| {
            fail(
                RowIssueCode::InvalidPrice,
                format!("Price must be a number greater than 0, got '{raw_price}'"),
            )
        })?;

    let stock = match row.stock.as_deref() {
        None => 0,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|s| *s >= 0)
            .ok_or_else(|| {
                fail(
                    RowIssueCode::InvalidStock,
                    format!("Stock must be a whole number of at least 0, got '{raw}'"),
                )
            })?,
    };

    let raw_category = row.category_id.as_deref().ok_or_else(|| {
        fail(
            RowIssueCode::MissingCategory,
            "CategoryId is required".to_string(),
        )
    })?;
    let category_id = raw_category
        .parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            fail(
                RowIssueCode::InvalidCategory,
                format!("CategoryId must be a positive integer, got '{raw_category}'"),
            )
        })?;

    Ok(ProductImportRow {
        name,
        description: row.description.clone(),
        sku: row.sku.clone(),
        price,
        stock,
        category_id,
    })
}

// ── CSV reading ──────────────────────────────────────────────────────

/// Read raw rows from CSV data with a header line.
///
/// Headers are matched case-insensitively; unknown columns are ignored and
/// a missing required column fails the whole file. Blank lines are skipped.
pub fn read_csv_rows<R: io::Read>(reader: R) -> Result<Vec<BulkImportRow>, CoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| CoreError::Validation(format!("Unreadable CSV header: {e}")))?
        .clone();

    let mut positions: Vec<(ImportColumn, usize)> = Vec::new();
    for column in ImportColumn::ALL {
        match headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column.header()))
        {
            Some(index) => positions.push((column, index)),
            None if column.is_required() => {
                return Err(CoreError::Validation(format!(
                    "Missing required column: {}",
                    column.header()
                )));
            }
            None => {}
        }
    }

    let mut rows = Vec::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let record =
            record.map_err(|e| CoreError::Validation(format!("Unreadable CSV row: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        // Header is spreadsheet row 1. Counted by record, so a quoted cell
        // spanning several lines is still one row.
        let row_index = offset as u32 + 2;

        let mut row = BulkImportRow {
            row_index,
            ..BulkImportRow::default()
        };
        for (column, index) in &positions {
            let value = record
                .get(*index)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            row.set(*column, value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Read CSV data and coerce every row, collecting valid rows and failures.
pub fn check_csv<R: io::Read>(reader: R) -> Result<SchemaReport, CoreError> {
    let mut report = SchemaReport::default();
    for row in read_csv_rows(reader)? {
        match coerce(&row) {
            Ok(typed) => report.valid.push((row.row_index, typed)),
            Err(failure) => report.failures.push(failure),
        }
    }
    Ok(report)
}

// ── Tests ────────────────────────────────────────────────────────────
