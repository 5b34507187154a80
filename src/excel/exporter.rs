//! Excel exporter: one trip + receipts → a fixed-layout .xlsx sheet.

use crate::coerce::round_fixed;
use crate::dates;
use crate::error::{TripsheetError, TripsheetResult};
use crate::types::{Receipt, Trip, DEFAULT_CURRENCY};
use chrono::Datelike;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};
use std::path::Path;

/// Sheet name of the exported workbook.
pub const SHEET_NAME: &str = "Travel Expenses";

/// Receipt table column labels, in column order A..F.
pub const TABLE_HEADER: [&str; 6] = [
    "No",
    "Date",
    "Category",
    "Currency",
    "Exchange Rate",
    "Cost in EUR",
];

// 0-indexed rows of the fixed layout.
const TITLE_ROW: u32 = 0;
const ARRIVAL_ROW: u32 = 1;
const RETURN_ROW: u32 = 2;
const TRAVELER_ROW: u32 = 3;
const TABLE_HEADER_ROW: u32 = 5;
const DATA_START_ROW: u32 = 6;

// Character widths approximating the 55/120/220/95/120/120 px layout.
const COLUMN_WIDTHS: [f64; 6] = [7.0, 16.0, 30.0, 13.0, 16.0, 16.0];

// Pinned so identical input produces byte-identical workbooks.
const CREATION_DATE: (u16, u8, u8) = (2024, 1, 1);

/// Excel exporter for a single trip and its receipts.
///
/// Construction never fails and neither do malformed values: every field
/// has a defined default, so the only error paths are workbook I/O.
pub struct TripExporter {
    trip: Trip,
    receipts: Vec<Receipt>,
}

impl TripExporter {
    pub fn new(trip: Trip, receipts: Vec<Receipt>) -> Self {
        Self { trip, receipts }
    }

    /// Filename derived from the trip's ISO week: `Week{N}.xlsx`.
    pub fn suggested_filename(&self) -> String {
        format!("Week{}.xlsx", self.trip.iso_week)
    }

    /// Sum of all receipt costs, non-finite values counted as 0.
    pub fn total_cost(&self) -> f64 {
        self.receipts
            .iter()
            .map(|r| if r.cost_eur.is_finite() { r.cost_eur } else { 0.0 })
            .sum()
    }

    /// Export to an in-memory .xlsx byte buffer.
    pub fn to_bytes(&self) -> TripsheetResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save_to_buffer()
            .map_err(|e| TripsheetError::Export(format!("Failed to serialize workbook: {e}")))
    }

    /// Export to an .xlsx file on disk.
    pub fn export(&self, output_path: &Path) -> TripsheetResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| TripsheetError::Export(format!("Failed to save Excel file: {e}")))?;
        Ok(())
    }

    fn build_workbook(&self) -> TripsheetResult<Workbook> {
        let mut workbook = Workbook::new();

        let created = ExcelDateTime::from_ymd(CREATION_DATE.0, CREATION_DATE.1, CREATION_DATE.2)
            .map_err(|e| TripsheetError::Export(format!("Failed to pin creation date: {e}")))?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| TripsheetError::Export(format!("Failed to set worksheet name: {e}")))?;

        self.write_metadata_block(worksheet)?;
        self.write_receipt_table(worksheet)?;

        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet
                .set_column_width(col as u16, *width)
                .map_err(|e| TripsheetError::Export(format!("Failed to set column width: {e}")))?;
        }

        if !self.receipts.is_empty() {
            let last_data_row = DATA_START_ROW + self.receipts.len() as u32 - 1;
            worksheet
                .autofilter(TABLE_HEADER_ROW, 0, last_data_row, 5)
                .map_err(|e| TripsheetError::Export(format!("Failed to set autofilter: {e}")))?;
        }

        Ok(workbook)
    }

    /// Rows 1-4: labeled trip metadata. Dates become date-typed cells shown
    /// as `dd.mm.yyyy`, with the raw text as fallback when they don't parse.
    fn write_metadata_block(&self, worksheet: &mut Worksheet) -> TripsheetResult<()> {
        write_string(worksheet, TITLE_ROW, 0, "Trip Title")?;
        write_string(
            worksheet,
            TITLE_ROW,
            1,
            self.trip.title.as_deref().unwrap_or(""),
        )?;

        write_string(worksheet, ARRIVAL_ROW, 0, "Arrival Date")?;
        write_date_cell(worksheet, ARRIVAL_ROW, 1, &self.trip.arrival_date)?;

        write_string(worksheet, RETURN_ROW, 0, "Return Date")?;
        write_date_cell(worksheet, RETURN_ROW, 1, &self.trip.return_date)?;

        write_string(worksheet, TRAVELER_ROW, 0, "Traveler")?;
        write_string(worksheet, TRAVELER_ROW, 1, &self.trip.traveler)?;

        Ok(())
    }

    /// Row 6 header, one row per receipt, then the totals row.
    fn write_receipt_table(&self, worksheet: &mut Worksheet) -> TripsheetResult<()> {
        let rate_format = Format::new().set_num_format("0.000");
        let cost_format = Format::new().set_num_format("0.00");

        for (col, label) in TABLE_HEADER.iter().enumerate() {
            write_string(worksheet, TABLE_HEADER_ROW, col as u16, label)?;
        }

        for (idx, receipt) in self.receipts.iter().enumerate() {
            let row = DATA_START_ROW + idx as u32;

            write_number(worksheet, row, 0, (idx + 1) as f64)?;
            write_string(worksheet, row, 1, receipt.date.as_deref().unwrap_or(""))?;
            write_string(worksheet, row, 2, &receipt.category)?;

            let currency = if receipt.currency.trim().is_empty() {
                DEFAULT_CURRENCY
            } else {
                receipt.currency.trim()
            };
            write_string(worksheet, row, 3, currency)?;

            let rate = if receipt.exchange_rate.is_finite() {
                receipt.exchange_rate
            } else {
                1.0
            };
            worksheet
                .write_number_with_format(row, 4, round_fixed(rate, 3), &rate_format)
                .map_err(|e| TripsheetError::Export(format!("Failed to write rate: {e}")))?;

            let cost = if receipt.cost_eur.is_finite() {
                receipt.cost_eur
            } else {
                0.0
            };
            worksheet
                .write_number_with_format(row, 5, round_fixed(cost, 2), &cost_format)
                .map_err(|e| TripsheetError::Export(format!("Failed to write cost: {e}")))?;
        }

        let totals_row = DATA_START_ROW + self.receipts.len() as u32;
        write_string(worksheet, totals_row, 4, "Total")?;
        worksheet
            .write_number_with_format(totals_row, 5, round_fixed(self.total_cost(), 2), &cost_format)
            .map_err(|e| TripsheetError::Export(format!("Failed to write total: {e}")))?;

        Ok(())
    }
}

fn write_string(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
) -> TripsheetResult<()> {
    worksheet
        .write_string(row, col, value)
        .map_err(|e| TripsheetError::Export(format!("Failed to write text: {e}")))?;
    Ok(())
}

fn write_number(worksheet: &mut Worksheet, row: u32, col: u16, value: f64) -> TripsheetResult<()> {
    worksheet
        .write_number(row, col, value)
        .map_err(|e| TripsheetError::Export(format!("Failed to write number: {e}")))?;
    Ok(())
}

/// Write an ISO date string as a `dd.mm.yyyy` date cell, keeping the raw
/// text when the string is not a representable date.
fn write_date_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
) -> TripsheetResult<()> {
    if let Some(date) = dates::parse_iso(value) {
        if (1900..=9999).contains(&date.year()) {
            if let Ok(dt) =
                ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
            {
                let format = Format::new().set_num_format("dd.mm.yyyy");
                worksheet
                    .write_datetime_with_format(row, col, &dt, &format)
                    .map_err(|e| {
                        TripsheetError::Export(format!("Failed to write date: {e}"))
                    })?;
                return Ok(());
            }
        }
    }
    write_string(worksheet, row, col, value)
}
