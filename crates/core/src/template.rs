//! Example spreadsheet for the bulk product import.
//!
//! Produces a small CSV with the import header and two illustrative rows so
//! operators can see the expected layout. No I/O beyond an in-memory buffer.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::import_schema::ProductImportRow;

/// Suggested file name for the downloaded template.
pub const TEMPLATE_FILE_NAME: &str = "product_import_template.csv";

/// The illustrative rows included in the template.
pub fn example_rows() -> Vec<ProductImportRow> {
    vec![
        ProductImportRow {
            name: "Mechanical Keyboard".to_string(),
            description: Some("RGB keyboard with blue switches".to_string()),
            sku: Some("TECH-001".to_string()),
            price: Decimal::new(8999, 2),
            stock: 15,
            category_id: 1,
        },
        ProductImportRow {
            name: "Gaming Mouse".to_string(),
            description: Some("16000 DPI optical mouse".to_string()),
            sku: Some("TECH-002".to_string()),
            price: Decimal::new(4550, 2),
            stock: 25,
            category_id: 1,
        },
    ]
}

/// Render the template as CSV bytes (header plus [`example_rows`]).
pub fn export_template() -> Result<Vec<u8>, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in example_rows() {
        writer
            .serialize(&row)
            .map_err(|e| CoreError::Internal(format!("Failed to write template row: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("Failed to flush template: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_schema::{check_csv, ImportColumn};

    #[test]
    fn header_matches_import_columns() {
        let bytes = export_template().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();

        let expected: Vec<&str> = ImportColumn::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(header, expected.join(","));
        assert_eq!(header, "Name,Description,Sku,Price,Stock,CategoryId");
    }

    #[test]
    fn template_parses_back_unchanged() {
        let bytes = export_template().unwrap();
        let report = check_csv(bytes.as_slice()).unwrap();

        assert!(report.failures.is_empty());
        let parsed: Vec<ProductImportRow> = report.valid.into_iter().map(|(_, r)| r).collect();
        assert_eq!(parsed, example_rows());
    }

    #[test]
    fn example_rows_respect_constraints() {
        let rows = example_rows();
        assert!(rows.len() >= 2);
        for row in rows {
            assert!(row.price > Decimal::ZERO, "row: {}", row.name);
            assert!(row.stock >= 0, "row: {}", row.name);
        }
    }

    #[test]
    fn export_is_deterministic() {
        assert_eq!(export_template().unwrap(), export_template().unwrap());
    }
}
