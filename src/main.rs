use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tripsheet::cli;
use tripsheet::error::TripsheetResult;

#[derive(Parser)]
#[command(name = "tripsheet")]
#[command(about = "Travel expense trips as spreadsheets: .xlsx export and import.")]
#[command(long_about = "Tripsheet - travel expense spreadsheets

COMMANDS:
  export    - Trip JSON to a fixed-layout Excel sheet (Week{N}.xlsx)
  import    - Excel sheet (hand-edited welcome) to trip/receipt records
  summary   - Per-category totals for a trip
  validate  - Check trip records (date shape, ISO week invariant)

EXAMPLES:
  tripsheet export trip.json                    # writes Week50.xlsx next to it
  tripsheet import Week50.xlsx -o imported.json
  tripsheet import upload.xlsx --trip trip.json # merge into an existing trip
  tripsheet summary trip.json")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export a trip and its receipts to Excel.

Reads a JSON document {\"trip\": {...}, \"receipts\": [...]} and writes a
single-sheet .xlsx with the fixed layout: trip metadata block on top,
receipt table with No/Date/Category/Currency/Exchange Rate/Cost in EUR,
and a totals row. Malformed values are substituted with defaults, never
rejected. Output is byte-stable for identical input.")]
    /// Export a trip JSON document to a .xlsx file
    Export {
        /// Path to the trip JSON document
        input: PathBuf,

        /// Output .xlsx path (default: Week{isoWeek}.xlsx next to the input)
        output: Option<PathBuf>,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Import an Excel sheet into trip/receipt records.

Scans the first worksheet for a labeled metadata block (Arrival Date,
Return Date, Traveler, Trip Title) and for the receipt table header, then
normalizes every usable row. Rows with a blank category, a 'Total' label
or a zero/unparseable cost are skipped silently; a sheet without a
recognizable header fails as a whole and produces no records.

With --trip, the result is merged into an existing trip document: found
metadata overrides, missing fields keep their prior values, and the new
receipts are appended.")]
    /// Import a .xlsx file into trip/receipt records
    Import {
        /// Path to the Excel file (.xlsx)
        input: PathBuf,

        /// Output JSON path (default: input with .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prior trip JSON document to merge the import into
        #[arg(long)]
        trip: Option<PathBuf>,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show per-category totals for a trip
    Summary {
        /// Path to the trip JSON document
        file: PathBuf,
    },

    /// Validate trip records (date shape, ISO week invariant)
    Validate {
        /// Path to trip JSON document(s) to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> TripsheetResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tripsheet=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose),

        Commands::Import {
            input,
            output,
            trip,
            verbose,
        } => cli::import(input, output, trip, verbose),

        Commands::Summary { file } => cli::summary(file),

        Commands::Validate { files } => cli::validate(files),
    }
}
