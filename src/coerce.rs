//! Parse-or-default numeric coercion.
//!
//! Imported cost and rate cells come from hand-edited sheets, so every
//! helper returns a plain value with a defined default instead of a
//! fallible result. Callers that want to reject a default (the importer
//! drops zero-cost rows) do so themselves.

use calamine::Data;

/// Parse a decimal accepting both `.` and `,` as separator. Unparseable or
/// non-finite input yields 0.
pub fn parse_decimal_flexible(s: &str) -> f64 {
    let normalized = s.replace(',', ".");
    match normalized.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Coerce a spreadsheet cell to a number, defaulting to 0.
pub fn cell_to_number(cell: &Data) -> f64 {
    match cell {
        Data::Float(f) if f.is_finite() => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => parse_decimal_flexible(s),
        Data::DateTime(dt) => dt.as_f64(),
        _ => 0.0,
    }
}

/// Coerce a spreadsheet cell to trimmed text. Empty and error cells yield
/// the empty string; numbers are rendered the way the sheet shows them.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        other => other.to_string().trim().to_string(),
    }
}

/// Round to `digits` decimal places; non-finite input counts as 0.
pub fn round_fixed(n: f64, digits: u32) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    let scale = 10f64.powi(digits as i32);
    (n * scale).round() / scale
}

/// Render with a fixed number of decimals; non-finite input counts as 0.
pub fn format_fixed(n: f64, digits: usize) -> String {
    let value = if n.is_finite() { n } else { 0.0 };
    format!("{value:.digits$}")
}
