use crate::coerce::format_fixed;
use crate::error::{TripsheetError, TripsheetResult};
use crate::excel::{TripExporter, TripImporter};
use crate::types::TripFile;
use colored::Colorize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn read_trip_file(path: &Path) -> TripsheetResult<TripFile> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> TripsheetResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Execute the export command
pub fn export(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> TripsheetResult<()> {
    println!("{}", "🧾 Tripsheet - Excel Export".bold().green());
    println!("   Input:  {}\n", input.display());

    let document = read_trip_file(&input)?;

    if verbose {
        println!(
            "   Trip '{}' with {} receipts",
            document.trip.display_title().bright_blue(),
            document.receipts.len()
        );
    }

    let exporter = TripExporter::new(document.trip, document.receipts);
    let output = output.unwrap_or_else(|| input.with_file_name(exporter.suggested_filename()));

    if verbose {
        println!("   Total: {} EUR\n", format_fixed(exporter.total_cost(), 2));
    }

    exporter.export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Execute the import command
pub fn import(
    input: PathBuf,
    output: Option<PathBuf>,
    trip: Option<PathBuf>,
    verbose: bool,
) -> TripsheetResult<()> {
    println!("{}", "🧾 Tripsheet - Excel Import".bold().green());
    println!("   Input:  {}\n", input.display());

    let importer = TripImporter::from_path(&input)?;
    let summary = importer.import()?;

    if verbose {
        if let Some(title) = &summary.trip.title {
            println!("   Trip title: {}", title.bright_blue());
        }
        if let Some(arrival) = &summary.trip.arrival_date {
            println!("   Arrival:    {arrival}");
        }
        if let Some(ret) = &summary.trip.return_date {
            println!("   Return:     {ret}");
        }
        println!();
    }

    let output = output.unwrap_or_else(|| input.with_extension("json"));

    match trip {
        Some(prior_path) => {
            // Merge mode: apply the patch to the prior record, append the
            // new receipts, recompute the derived week number.
            let mut document = read_trip_file(&prior_path)?;
            summary.trip.apply(&mut document.trip);
            let week = document.trip.computed_iso_week();
            if week > 0 {
                document.trip.iso_week = week;
            }
            document.receipts.extend(summary.receipts.iter().cloned());
            write_json(&output, &document)?;
        }
        None => {
            write_json(&output, &summary)?;
        }
    }

    if summary.imported == 0 {
        println!(
            "{}",
            "⚠️  Import finished, but 0 receipts were detected. Check the Excel header/format."
                .yellow()
        );
    } else {
        println!(
            "{}",
            format!("✅ Import finished: {} receipts imported.", summary.imported)
                .bold()
                .green()
        );
    }
    println!("   Output: {}\n", output.display());

    Ok(())
}

/// Execute the summary command: per-category totals plus the grand total.
pub fn summary(file: PathBuf) -> TripsheetResult<()> {
    let document = read_trip_file(&file)?;

    println!(
        "{}",
        format!("🧾 {}", document.trip.display_title()).bold().green()
    );
    println!(
        "   {} → {}  ({})",
        document.trip.arrival_date,
        document.trip.return_date,
        document.trip.traveler
    );
    println!();

    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut grand_total = 0.0;
    for receipt in &document.receipts {
        let category = receipt.category.trim();
        let cost = if receipt.cost_eur.is_finite() {
            receipt.cost_eur
        } else {
            0.0
        };
        grand_total += cost;
        if category.is_empty() || cost == 0.0 {
            continue;
        }
        *totals.entry(category.to_string()).or_default() += cost;
    }

    let mut rows: Vec<(String, f64)> = totals.into_iter().collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (category, sum) in &rows {
        println!("   {:<24} {:>10} €", category, format_fixed(*sum, 2));
    }
    if !rows.is_empty() {
        println!();
    }
    println!(
        "   {:<24} {:>10} €",
        "Total".bold(),
        format_fixed(grand_total, 2).bold()
    );

    Ok(())
}

/// Execute the validate command: date shape plus the derived-week invariant.
pub fn validate(files: Vec<PathBuf>) -> TripsheetResult<()> {
    let mut failures = 0usize;

    for file in &files {
        let document = read_trip_file(file)?;
        let trip = &document.trip;
        let mut issues: Vec<String> = Vec::new();

        if crate::dates::parse_iso(&trip.arrival_date).is_none() {
            issues.push(format!("arrival date '{}' is not YYYY-MM-DD", trip.arrival_date));
        }
        if crate::dates::parse_iso(&trip.return_date).is_none() {
            issues.push(format!("return date '{}' is not YYYY-MM-DD", trip.return_date));
        }
        if !(1..=53).contains(&trip.iso_week) {
            issues.push(format!("isoWeek {} outside 1..=53", trip.iso_week));
        }
        let computed = trip.computed_iso_week();
        if computed > 0 && computed != trip.iso_week {
            issues.push(format!(
                "isoWeek {} does not match week {} of the trip dates",
                trip.iso_week, computed
            ));
        }

        if issues.is_empty() {
            println!("{} {}", "✅".green(), file.display());
        } else {
            failures += 1;
            println!("{} {}", "❌".red(), file.display());
            for issue in &issues {
                println!("      {}", issue.yellow());
            }
        }
    }

    if failures > 0 {
        return Err(TripsheetError::Validation(format!(
            "{failures} of {} file(s) failed validation",
            files.len()
        )));
    }
    Ok(())
}
