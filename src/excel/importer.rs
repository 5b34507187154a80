//! Excel importer: an uploaded .xlsx sheet → trip patch + receipt records.
//!
//! Sheets arrive hand-edited, so nothing about the layout is trusted: the
//! metadata block and the receipt table are both located by scanning cell
//! text. Structural problems (no recognizable header, required columns
//! missing) abort the whole import before any record is produced; broken
//! individual rows are skipped silently.

use crate::coerce::{cell_to_number, cell_to_string};
use crate::dates;
use crate::error::{TripsheetError, TripsheetResult};
use crate::types::{ImportSummary, Receipt, TripPatch, DEFAULT_CURRENCY, DEFAULT_TRAVELER};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Shown to users when no header row can be located.
pub const HEADER_NOT_FOUND: &str = "Receipt header row not found. \
Expected columns like: Date, Category, Currency, Exchange Rate, Cost in EUR.";

/// Shown to users when the header row lacks the required columns.
pub const REQUIRED_COLUMNS_MISSING: &str =
    "required columns not found (Category / Cost in EUR)";

/// Rows scanned for the labeled metadata block.
const METADATA_SCAN_ROWS: usize = 30;

/// Rows scanned for the receipt table header.
const HEADER_SCAN_ROWS: usize = 120;

//==============================================================================
// Metadata label rules
//==============================================================================

/// Trip fields a metadata label can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaField {
    ArrivalDate,
    ReturnDate,
    Traveler,
    Title,
}

fn is_arrival_label(label: &str) -> bool {
    label.contains("arrival")
}

fn is_return_label(label: &str) -> bool {
    label.contains("return")
}

fn is_traveler_label(label: &str) -> bool {
    label.contains("traveler")
}

fn is_title_label(label: &str) -> bool {
    label.contains("trip title") || (label.contains("trip") && label.contains("title"))
}

/// Label predicates evaluated in order against each normalized row label.
/// A label may satisfy several rules; each match assigns its field.
const LABEL_RULES: [(fn(&str) -> bool, MetaField); 4] = [
    (is_arrival_label, MetaField::ArrivalDate),
    (is_return_label, MetaField::ReturnDate),
    (is_traveler_label, MetaField::Traveler),
    (is_title_label, MetaField::Title),
];

//==============================================================================
// Header column resolution
//==============================================================================

/// Resolved 0-based column positions of the receipt table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableColumns {
    date: Option<usize>,
    category: usize,
    currency: Option<usize>,
    rate: Option<usize>,
    cost: usize,
}

/// Lowercase, collapse runs of whitespace, trim.
fn norm(cell: &Data) -> String {
    cell_to_string(cell)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_header_row(cells: &[String]) -> bool {
    let has_date = cells.iter().any(|c| c == "date" || c.contains("date"));
    let has_category = cells.iter().any(|c| c.contains("category"));
    let has_cost = cells.iter().any(|c| c.contains("cost") && c.contains("eur"));
    has_date && has_category && has_cost
}

fn resolve_columns(header: &[String]) -> TripsheetResult<TableColumns> {
    let date = header
        .iter()
        .position(|h| h == "date" || h.contains("date"));
    let category = header.iter().position(|h| h.contains("category"));
    let currency = header
        .iter()
        .position(|h| h.contains("currency") || h == "curr");
    let rate = header
        .iter()
        .position(|h| h.contains("exchange") || h.contains("rate"));
    let cost = header
        .iter()
        .position(|h| h.contains("cost") && h.contains("eur"));

    match (category, cost) {
        (Some(category), Some(cost)) => Ok(TableColumns {
            date,
            category,
            currency,
            rate,
            cost,
        }),
        _ => Err(TripsheetError::Import(REQUIRED_COLUMNS_MISSING.to_string())),
    }
}

//==============================================================================
// Importer
//==============================================================================

/// Excel importer for a single trip sheet (first worksheet only).
pub struct TripImporter {
    rows: Vec<Vec<Data>>,
}

impl TripImporter {
    /// Open an .xlsx file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> TripsheetResult<Self> {
        let workbook: Xlsx<_> = open_workbook(path.as_ref())
            .map_err(|e| TripsheetError::Spreadsheet(format!("Failed to open Excel file: {e}")))?;
        Self::from_workbook(workbook)
    }

    /// Read an .xlsx document from an in-memory byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> TripsheetResult<Self> {
        let workbook = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| TripsheetError::Spreadsheet(format!("Failed to read Excel data: {e}")))?;
        Self::from_workbook(workbook)
    }

    fn from_workbook<RS: std::io::Read + std::io::Seek>(
        mut workbook: Xlsx<RS>,
    ) -> TripsheetResult<Self> {
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TripsheetError::Spreadsheet("Workbook has no sheets".to_string()))?;
        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| TripsheetError::Spreadsheet(format!("Failed to read sheet: {e}")))?;

        let rows = range.rows().map(|r| r.to_vec()).collect();
        Ok(Self { rows })
    }

    /// Run the full import: metadata scan, header scan, row extraction.
    ///
    /// Returns pure data — persisting the patch and the receipts is the
    /// caller's job. Structural failures return an error and no records.
    pub fn import(&self) -> TripsheetResult<ImportSummary> {
        let trip = self.extract_metadata();

        let header_idx = self
            .find_header_row()
            .ok_or_else(|| TripsheetError::Import(HEADER_NOT_FOUND.to_string()))?;
        let header: Vec<String> = self.rows[header_idx].iter().map(norm).collect();
        let columns = resolve_columns(&header)?;

        let receipts = self.extract_receipts(header_idx, &columns);
        let imported = receipts.len();

        Ok(ImportSummary {
            trip,
            receipts,
            imported,
        })
    }

    /// Two-column key/value scan over the first rows of the sheet.
    fn extract_metadata(&self) -> TripPatch {
        let mut patch = TripPatch::default();

        for row in self.rows.iter().take(METADATA_SCAN_ROWS) {
            if row.len() < 2 {
                continue;
            }
            let label = norm(&row[0]);
            if label.is_empty() {
                continue;
            }
            let value = &row[1];

            for (matches, field) in LABEL_RULES {
                if !matches(&label) {
                    continue;
                }
                match field {
                    MetaField::ArrivalDate => patch.arrival_date = dates::parse_date_cell(value),
                    MetaField::ReturnDate => patch.return_date = dates::parse_date_cell(value),
                    MetaField::Traveler => {
                        let text = cell_to_string(value);
                        patch.traveler = (!text.is_empty()).then_some(text);
                    }
                    MetaField::Title => {
                        let text = cell_to_string(value);
                        patch.title = (!text.is_empty()).then_some(text);
                    }
                }
            }
        }

        if patch.traveler.is_none() {
            patch.traveler = Some(DEFAULT_TRAVELER.to_string());
        }
        if patch.title.is_none() {
            if let Some(base) = patch.arrival_date.as_ref().or(patch.return_date.as_ref()) {
                patch.title = Some(format!("Week {}", dates::iso_week_of(base)));
            }
        }

        patch
    }

    fn find_header_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .take(HEADER_SCAN_ROWS)
            .position(|row| is_header_row(&row.iter().map(norm).collect::<Vec<_>>()))
    }

    /// Walk the rows after the header and normalize every usable one.
    fn extract_receipts(&self, header_idx: usize, columns: &TableColumns) -> Vec<Receipt> {
        let mut receipts = Vec::new();

        for (offset, row) in self.rows[header_idx + 1..].iter().enumerate() {
            let row_number = header_idx + 2 + offset;

            if row.iter().all(|c| cell_to_string(c).is_empty()) {
                continue;
            }

            let category = row
                .get(columns.category)
                .map(cell_to_string)
                .unwrap_or_default();
            if category.is_empty() {
                debug!(row = row_number, "skipping row: blank category");
                continue;
            }
            if category.to_lowercase().contains("total") {
                debug!(row = row_number, "skipping row: totals line");
                continue;
            }

            let cost_eur = row.get(columns.cost).map(cell_to_number).unwrap_or(0.0);
            if cost_eur == 0.0 {
                debug!(row = row_number, "skipping row: zero or unparseable cost");
                continue;
            }

            let date = columns
                .date
                .and_then(|i| row.get(i))
                .and_then(dates::parse_date_cell);

            let currency = columns
                .currency
                .and_then(|i| row.get(i))
                .map(cell_to_string)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

            let rate = columns
                .rate
                .and_then(|i| row.get(i))
                .map(cell_to_number)
                .unwrap_or(1.0);
            let exchange_rate = if rate == 0.0 { 1.0 } else { rate };

            receipts.push(Receipt {
                trip_id: None,
                date,
                category,
                currency,
                exchange_rate,
                cost_eur,
                file_key: None,
                file_name: None,
                mime_type: None,
            });
        }

        receipts
    }
}
