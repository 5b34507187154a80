use serde::{Deserialize, Serialize};

use crate::dates;

//==============================================================================
// Defaults shared by the exporter, the importer and the CLI
//==============================================================================

/// Currency assumed when a receipt carries none.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Traveler name substituted when an imported sheet has no traveler row.
pub const DEFAULT_TRAVELER: &str = "Mustafa Resitoglu";

/// Display set of receipt categories. Informational only: imports accept
/// arbitrary category text.
pub const CATEGORIES: [&str; 4] = ["Food and Drinks", "Fuel", "Hotel", "Car"];

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_exchange_rate() -> f64 {
    1.0
}

//==============================================================================
// Records
//==============================================================================

/// A travel period owning zero or more receipts.
///
/// Dates are ISO `YYYY-MM-DD` strings. `iso_week` is derived data: callers
/// recompute it from `arrival_date` (or `return_date` when arrival is blank)
/// rather than trusting the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub arrival_date: String,
    pub return_date: String,
    pub traveler: String,
    #[serde(default)]
    pub iso_week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Trip {
    /// Title shown to users: the stored title, or `Week {isoWeek}`.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => format!("Week {}", self.iso_week),
        }
    }

    /// ISO week derived from the arrival date, falling back to the return
    /// date. 0 when neither parses.
    pub fn computed_iso_week(&self) -> u32 {
        let week = dates::iso_week_of(&self.arrival_date);
        if week > 0 {
            week
        } else {
            dates::iso_week_of(&self.return_date)
        }
    }
}

/// One expense line item attached to a trip.
///
/// The attachment triple (`file_key`/`file_name`/`mime_type`) references an
/// external blob store and is carried opaquely; import and export never
/// populate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub category: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
    #[serde(default)]
    pub cost_eur: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Receipt {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            trip_id: None,
            date: None,
            category: category.into(),
            currency: default_currency(),
            exchange_rate: 1.0,
            cost_eur: 0.0,
            file_key: None,
            file_name: None,
            mime_type: None,
        }
    }
}

/// Partial trip update produced by the importer.
///
/// `None` means "field not present in the sheet — keep the prior value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traveler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        self.arrival_date.is_none()
            && self.return_date.is_none()
            && self.traveler.is_none()
            && self.title.is_none()
    }

    /// Merge into an existing trip: found fields override, missing fields
    /// retain the prior value. `iso_week` is not touched here.
    pub fn apply(&self, trip: &mut Trip) {
        if let Some(arrival) = &self.arrival_date {
            trip.arrival_date = arrival.clone();
        }
        if let Some(ret) = &self.return_date {
            trip.return_date = ret.clone();
        }
        if let Some(traveler) = &self.traveler {
            trip.traveler = traveler.clone();
        }
        if let Some(title) = &self.title {
            trip.title = Some(title.clone());
        }
    }
}

/// The JSON document the CLI reads and writes: one trip plus its receipts
/// in sheet order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFile {
    pub trip: Trip,
    #[serde(default)]
    pub receipts: Vec<Receipt>,
}

/// Result of a successful import: a trip patch, the normalized receipts
/// and how many rows survived the filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub trip: TripPatch,
    pub receipts: Vec<Receipt>,
    #[serde(rename = "importedCount")]
    pub imported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_prefers_stored_title() {
        let trip = Trip {
            arrival_date: "2025-12-08".to_string(),
            return_date: "2025-12-12".to_string(),
            traveler: "Musti".to_string(),
            iso_week: 50,
            title: Some("Hamburg".to_string()),
        };
        assert_eq!(trip.display_title(), "Hamburg");
    }

    #[test]
    fn test_display_title_falls_back_to_week() {
        let trip = Trip {
            arrival_date: "2025-12-08".to_string(),
            return_date: "2025-12-12".to_string(),
            traveler: "Musti".to_string(),
            iso_week: 50,
            title: None,
        };
        assert_eq!(trip.display_title(), "Week 50");
    }

    #[test]
    fn test_computed_iso_week_uses_return_when_arrival_blank() {
        let trip = Trip {
            arrival_date: String::new(),
            return_date: "2025-12-12".to_string(),
            traveler: "Musti".to_string(),
            iso_week: 0,
            title: None,
        };
        assert_eq!(trip.computed_iso_week(), 50);
    }

    #[test]
    fn test_patch_apply_retains_missing_fields() {
        let mut trip = Trip {
            arrival_date: "2025-12-08".to_string(),
            return_date: "2025-12-12".to_string(),
            traveler: "Musti".to_string(),
            iso_week: 50,
            title: Some("Hamburg".to_string()),
        };
        let patch = TripPatch {
            traveler: Some("Ayse".to_string()),
            ..Default::default()
        };
        patch.apply(&mut trip);
        assert_eq!(trip.traveler, "Ayse");
        assert_eq!(trip.arrival_date, "2025-12-08");
        assert_eq!(trip.title.as_deref(), Some("Hamburg"));
    }

    #[test]
    fn test_receipt_json_defaults() {
        let receipt: Receipt =
            serde_json::from_str(r#"{"category":"Fuel","costEur":12.5}"#).unwrap();
        assert_eq!(receipt.currency, "EUR");
        assert_eq!(receipt.exchange_rate, 1.0);
        assert_eq!(receipt.cost_eur, 12.5);
        assert!(receipt.date.is_none());
    }

    #[test]
    fn test_import_summary_count_field_name() {
        let summary = ImportSummary {
            trip: TripPatch::default(),
            receipts: vec![],
            imported: 3,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"importedCount\":3"));
    }
}
