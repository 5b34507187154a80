//! Tripsheet - travel expense trips as spreadsheets
//!
//! This library turns a trip and its receipts into a fixed-layout Excel
//! sheet and reads such sheets (including hand-edited ones) back into
//! normalized records.
//!
//! # Features
//!
//! - Fixed-layout .xlsx export (metadata block, receipt table, totals row)
//! - Heuristic import: metadata and table header located by scanning text
//! - Tolerant coercion: flexible decimals, four date spellings, Excel
//!   serial dates, ISO week numbering
//! - Deterministic output: identical input yields byte-identical workbooks
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tripsheet::excel::{TripExporter, TripImporter};
//! use tripsheet::types::{Receipt, Trip};
//!
//! let trip = Trip {
//!     arrival_date: "2025-12-08".to_string(),
//!     return_date: "2025-12-12".to_string(),
//!     traveler: "Musti".to_string(),
//!     iso_week: 50,
//!     title: None,
//! };
//! let receipts = vec![Receipt::new("Fuel")];
//!
//! let exporter = TripExporter::new(trip, receipts);
//! exporter.export(Path::new("Week50.xlsx"))?;
//!
//! let summary = TripImporter::from_path("Week50.xlsx")?.import()?;
//! println!("{} receipts imported", summary.imported);
//! # Ok::<(), tripsheet::error::TripsheetError>(())
//! ```

pub mod cli;
pub mod coerce;
pub mod dates;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{TripsheetError, TripsheetResult};
pub use types::{ImportSummary, Receipt, Trip, TripFile, TripPatch};
