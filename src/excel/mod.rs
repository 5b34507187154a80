//! Excel import/export for trip records
//!
//! Bidirectional trip ↔ .xlsx conversion:
//! - Export: one trip + receipts → fixed-layout .xlsx (deterministic bytes)
//! - Import: arbitrary hand-edited .xlsx → trip patch + normalized receipts

mod exporter;
mod importer;

pub use exporter::{TripExporter, SHEET_NAME, TABLE_HEADER};
pub use importer::{TripImporter, HEADER_NOT_FOUND, REQUIRED_COLUMNS_MISSING};
